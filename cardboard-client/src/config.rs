/// How committing the description decides whether the description itself is
/// part of the update
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptionMerge {
    /// The description is sent only if the working title is non-blank and
    /// differs from the original *description*. Kept for hosts that need the
    /// historical behavior.
    Legacy,

    /// The description is always sent once it passed the blank and unchanged
    /// checks
    #[default]
    Corrected,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SessionConfig {
    pub description_merge: DescriptionMerge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_corrected() {
        assert_eq!(
            SessionConfig::default().description_merge,
            DescriptionMerge::Corrected
        );
        let cfg: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn parses_legacy() {
        let cfg: SessionConfig =
            serde_json::from_str(r#"{"description-merge":"legacy"}"#).unwrap();
        assert_eq!(cfg.description_merge, DescriptionMerge::Legacy);
    }
}
