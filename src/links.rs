//! Link rewriting for payload and spec paths shown in the report.
//!
//! With overrides disabled, paths pass through unchanged. With overrides
//! enabled, payload files are re-rooted under the payload prefix by file name
//! and spec files under the spec prefix from the `specification` directory on.

/// Path component marking the root of the specification tree.
pub const SPEC_ROOT_MARKER: &str = "specification";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLink {
    pub link: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Prefix-override policy; prefixes are normalized once on construction.
pub struct LinkPolicy {
    override_enabled: bool,
    spec_prefix: String,
    payload_prefix: String,
}

impl LinkPolicy {
    pub fn new(override_enabled: bool, spec_prefix: &str, payload_prefix: &str) -> Self {
        let normalize = |p: &str| {
            if override_enabled {
                p.strip_suffix('/').unwrap_or(p).to_string()
            } else {
                p.to_string()
            }
        };
        Self {
            override_enabled,
            spec_prefix: normalize(spec_prefix),
            payload_prefix: normalize(payload_prefix),
        }
    }

    #[cfg(test)]
    fn spec_prefix(&self) -> &str {
        &self.spec_prefix
    }

    #[cfg(test)]
    fn payload_prefix(&self) -> &str {
        &self.payload_prefix
    }

    /// Rewrite a payload file path; `None` when no path was recorded.
    pub fn rewrite_payload_link(&self, raw: Option<&str>) -> Option<RewrittenLink> {
        let raw = raw?;
        let label = last_segment(raw).to_string();
        let link = if self.override_enabled {
            format!("{}/{}", self.payload_prefix, label)
        } else {
            raw.to_string()
        };
        Some(RewrittenLink { link, label })
    }

    /// Rewrite a spec file path; `None` when no path was recorded.
    pub fn rewrite_spec_link(&self, raw: Option<&str>) -> Option<RewrittenLink> {
        let raw = raw?;
        let label = last_segment(raw).to_string();
        let link = if self.override_enabled {
            // Without the marker the whole path is appended.
            let tail = raw
                .find(SPEC_ROOT_MARKER)
                .map(|i| &raw[i..])
                .unwrap_or(raw);
            format!("{}/{}", self.spec_prefix, tail)
        } else {
            raw.to_string()
        };
        Some(RewrittenLink { link, label })
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_disabled_passes_paths_through() {
        let policy = LinkPolicy::new(false, "https://specs/", "https://payloads/");
        let p = policy
            .rewrite_payload_link(Some("/tmp/runs/run1/foo.json"))
            .unwrap();
        assert_eq!(p.link, "/tmp/runs/run1/foo.json");
        assert_eq!(p.label, "foo.json");
        let s = policy
            .rewrite_spec_link(Some("/repo/specification/pets/pets.json"))
            .unwrap();
        assert_eq!(s.link, "/repo/specification/pets/pets.json");
        assert_eq!(s.label, "pets.json");
        // prefixes are left untouched when overrides are off
        assert_eq!(policy.payload_prefix(), "https://payloads/");
    }

    #[test]
    fn test_payload_override_uses_file_name() {
        let policy = LinkPolicy::new(true, "", "https://x/");
        let p = policy
            .rewrite_payload_link(Some("/data/out/run1/foo.json"))
            .unwrap();
        assert_eq!(p.link, "https://x/foo.json");
        assert_eq!(p.label, "foo.json");
    }

    #[test]
    fn test_trailing_slash_stripped_once() {
        let policy = LinkPolicy::new(true, "https://s//", "https://p//");
        assert_eq!(policy.spec_prefix(), "https://s/");
        assert_eq!(policy.payload_prefix(), "https://p/");
    }

    #[test]
    fn test_spec_override_reroots_at_marker() {
        let policy = LinkPolicy::new(true, "https://github.com/org/specs/blob/main/", "");
        let s = policy
            .rewrite_spec_link(Some("/home/me/specs/specification/pets/stable/pets.json"))
            .unwrap();
        assert_eq!(
            s.link,
            "https://github.com/org/specs/blob/main/specification/pets/stable/pets.json"
        );
        assert_eq!(s.label, "pets.json");

        let no_marker = policy.rewrite_spec_link(Some("local/pets.json")).unwrap();
        assert_eq!(
            no_marker.link,
            "https://github.com/org/specs/blob/main/local/pets.json"
        );
    }

    #[test]
    fn test_absent_path_yields_nothing() {
        let policy = LinkPolicy::new(true, "a", "b");
        assert!(policy.rewrite_payload_link(None).is_none());
        assert!(policy.rewrite_spec_link(None).is_none());
    }
}
