use crate::{
    api::{self, Card, Comment},
    DescriptionMerge,
};

/// Which session operation a patch is being built for
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cause {
    Title,
    Description,
    Comments,
}

/// The working state of an open editor, as seen by `compute_patch`
#[derive(Clone, Copy, Debug)]
pub struct Draft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub comments: &'a [Comment],
    pub description_editing: bool,
}

/// The fields of a card that an update replaces, `None` meaning "keep"
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Patch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub comments: Option<Vec<Comment>>,
}

impl Patch {
    pub fn apply_to(&self, card: &Card) -> Card {
        let mut res = card.clone();
        if let Some(title) = &self.title {
            res.title = title.clone();
        }
        if let Some(description) = &self.description {
            res.description = description.clone();
        }
        if let Some(comments) = &self.comments {
            res.comments = comments.clone();
        }
        res
    }
}

// A description typed in the editor is only sent along with other fields once
// the editor was closed, so that a half-written description is never stored
fn pending_description(original: &Card, working: &Draft) -> Option<String> {
    (!api::is_blank(working.description)
        && working.description != original.description
        && !working.description_editing)
        .then(|| working.description.to_string())
}

fn title_or_original(original: &Card, working: &Draft) -> String {
    if api::is_blank(working.title) {
        original.title.clone()
    } else {
        working.title.to_string()
    }
}

pub fn compute_patch(
    original: &Card,
    working: &Draft,
    cause: Cause,
    mode: DescriptionMerge,
) -> Patch {
    match cause {
        Cause::Title => Patch {
            title: Some(title_or_original(original, working)),
            description: pending_description(original, working),
            comments: None,
        },
        Cause::Description => {
            let title = title_or_original(original, working);
            let with_description = match mode {
                DescriptionMerge::Legacy => {
                    !api::is_blank(working.title) && working.title != original.description
                }
                DescriptionMerge::Corrected => true,
            };
            Patch {
                title: Some(title),
                description: with_description.then(|| working.description.to_string()),
                comments: None,
            }
        }
        Cause::Comments => Patch {
            title: Some(original.title.clone()),
            description: pending_description(original, working),
            comments: Some(working.comments.to_vec()),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn card(title: &str, description: &str) -> Card {
        let mut c = Card::new(String::from(title));
        c.description = String::from(description);
        c
    }

    fn draft<'a>(title: &'a str, description: &'a str, editing: bool) -> Draft<'a> {
        Draft {
            title,
            description,
            comments: &[],
            description_editing: editing,
        }
    }

    #[test]
    fn title_patch_skips_description_being_edited() {
        let orig = card("Old", "desc");
        let p = compute_patch(
            &orig,
            &draft("New", "half typed", true),
            Cause::Title,
            DescriptionMerge::Corrected,
        );
        assert_eq!(
            p,
            Patch {
                title: Some(String::from("New")),
                ..Patch::default()
            }
        );
    }

    #[test]
    fn title_patch_carries_finished_description() {
        let orig = card("Old", "desc");
        let p = compute_patch(
            &orig,
            &draft("New", "new desc", false),
            Cause::Title,
            DescriptionMerge::Corrected,
        );
        assert_eq!(p.title.as_deref(), Some("New"));
        assert_eq!(p.description.as_deref(), Some("new desc"));
        assert_eq!(p.comments, None);
    }

    #[test]
    fn title_patch_ignores_blank_or_unchanged_description() {
        let orig = card("Old", "desc");
        for d in ["desc", "  "] {
            let p = compute_patch(
                &orig,
                &draft("New", d, false),
                Cause::Title,
                DescriptionMerge::Corrected,
            );
            assert_eq!(p.description, None, "description {d:?}");
        }
    }

    #[test]
    fn legacy_description_merge_compares_title_with_description() {
        let orig = card("Same", "Same");
        let p = compute_patch(
            &orig,
            &draft("Same", "Different", true),
            Cause::Description,
            DescriptionMerge::Legacy,
        );
        assert_eq!(p.title.as_deref(), Some("Same"));
        assert_eq!(p.description, None);

        let orig = card("Design doc", "");
        let p = compute_patch(
            &orig,
            &draft("Design doc", "Write it", true),
            Cause::Description,
            DescriptionMerge::Legacy,
        );
        assert_eq!(p.description.as_deref(), Some("Write it"));
    }

    #[test]
    fn corrected_description_merge_always_sends_description() {
        let orig = card("Same", "Same");
        let p = compute_patch(
            &orig,
            &draft("Same", "Different", true),
            Cause::Description,
            DescriptionMerge::Corrected,
        );
        assert_eq!(p.title.as_deref(), Some("Same"));
        assert_eq!(p.description.as_deref(), Some("Different"));
    }

    #[test]
    fn description_patch_never_sends_blank_title() {
        let orig = card("Kept", "");
        for mode in [DescriptionMerge::Legacy, DescriptionMerge::Corrected] {
            let p = compute_patch(&orig, &draft(" ", "text", true), Cause::Description, mode);
            assert_eq!(p.title.as_deref(), Some("Kept"));
        }
    }

    #[test]
    fn comments_patch_keeps_original_title() {
        let orig = card("Stored", "desc");
        let comments = vec![Comment::now("hi", &[]).unwrap()];
        let working = Draft {
            title: "Unsaved",
            description: "desc",
            comments: &comments,
            description_editing: false,
        };
        let p = compute_patch(&orig, &working, Cause::Comments, DescriptionMerge::Corrected);
        assert_eq!(p.title.as_deref(), Some("Stored"));
        assert_eq!(p.description, None);
        assert_eq!(p.comments, Some(comments));
    }

    #[test]
    fn apply_replaces_only_present_fields() {
        let orig = card("t", "d");
        let merged = Patch {
            title: Some(String::from("T")),
            description: None,
            comments: Some(Vec::new()),
        }
        .apply_to(&orig);
        assert_eq!(merged.id, orig.id);
        assert_eq!(merged.title, "T");
        assert_eq!(merged.description, "d");
    }

    #[test]
    fn patch_always_has_non_blank_title() {
        bolero::check!()
            .with_type::<(String, String, String, bool, u8)>()
            .cloned()
            .for_each(|(orig_title, title, description, editing, cause)| {
                let orig_title = if api::is_blank(&orig_title) {
                    String::from("fallback")
                } else {
                    orig_title
                };
                let orig = card(&orig_title, "");
                let comments = vec![Comment::new("c", Utc::now(), &[]).unwrap()];
                let working = Draft {
                    title: &title,
                    description: &description,
                    comments: &comments,
                    description_editing: editing,
                };
                let cause = match cause % 3 {
                    0 => Cause::Title,
                    1 => Cause::Description,
                    _ => Cause::Comments,
                };
                for mode in [DescriptionMerge::Legacy, DescriptionMerge::Corrected] {
                    let p = compute_patch(&orig, &working, cause, mode);
                    let t = p.title.expect("patch without title");
                    assert!(!api::is_blank(&t));
                    if let Some(d) = p.description {
                        assert_eq!(d, description);
                    }
                    assert_eq!(p.comments.is_some(), cause == Cause::Comments);
                }
            });
    }
}
