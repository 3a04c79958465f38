use std::collections::BTreeSet;

use crate::document::{Document, Selector};
use crate::error::DomError;

fn controls() -> Selector {
    Selector::tags(&["input", "textarea", "select"])
}

/// Give every form control an id and, unless it is hidden, a `<label>`.
///
/// Ids are `input-{index}` with the index counted per form; an author id
/// already using that value gets a numbered suffix instead. Returns the
/// number of labels created.
///
/// # Errors
///
/// Returns the first DOM failure; controls handled before it keep their
/// changes.
pub fn backfill_form_labels<D: Document>(doc: &D) -> Result<usize, DomError> {
    let mut created = 0;
    for form in doc.query_all(None, &Selector::tag("form")) {
        let inputs = doc.query_all(Some(&form), &controls());
        let mut taken: BTreeSet<String> = inputs
            .iter()
            .filter_map(|input| doc.non_empty_attribute(input, "id"))
            .collect();

        for (index, input) in inputs.iter().enumerate() {
            let id = match doc.non_empty_attribute(input, "id") {
                Some(id) => id,
                None => {
                    let id = synthetic_id(index, &taken);
                    doc.set_attribute(input, "id", &id)?;
                    taken.insert(id.clone());
                    id
                }
            };

            let labelled = doc
                .query_first(Some(&form), &Selector::tag("label").equals("for", &id))
                .is_some();
            let hidden = doc
                .attribute(input, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
            if labelled || hidden {
                continue;
            }

            let text = doc
                .non_empty_attribute(input, "placeholder")
                .or_else(|| doc.non_empty_attribute(input, "name"))
                .unwrap_or_else(|| format!("Input {}", index + 1));
            let label = doc.create_element("label")?;
            doc.set_attribute(&label, "for", &id)?;
            doc.set_text_content(&label, &text);
            doc.insert_before(input, &label)?;
            created += 1;
        }
    }
    Ok(created)
}

fn synthetic_id(index: usize, taken: &BTreeSet<String>) -> String {
    let base = format!("input-{index}");
    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    #[test]
    fn label_text_prefers_placeholder_then_name() {
        let page = Page::new();
        let form = page.add(page.body_id(), "form").id();
        let email = page
            .add(form, "input")
            .attr("placeholder", "メールアドレス")
            .attr("name", "email")
            .id();
        let name = page.add(form, "input").attr("name", "name").id();
        let bare = page.add(form, "textarea").id();

        assert_eq!(backfill_form_labels(&page).unwrap(), 3);
        let labels = page.query_all(Some(&form), &Selector::tag("label"));
        let texts: Vec<String> = labels.iter().map(|l| page.text_content(l)).collect();
        assert_eq!(texts, ["メールアドレス", "name", "Input 3"]);
        assert_eq!(page.attribute(&email, "id").as_deref(), Some("input-0"));
        assert_eq!(page.attribute(&name, "id").as_deref(), Some("input-1"));
        assert_eq!(page.attribute(&bare, "id").as_deref(), Some("input-2"));
    }

    #[test]
    fn hidden_and_labelled_controls_get_no_label() {
        let page = Page::new();
        let form = page.add(page.body_id(), "form").id();
        let _ = page.add(form, "label").attr("for", "q").text("検索").id();
        let _ = page.add(form, "input").attr("id", "q").id();
        let token = page.add(form, "input").attr("type", "hidden").id();

        assert_eq!(backfill_form_labels(&page).unwrap(), 0);
        assert_eq!(page.attribute(&token, "id").as_deref(), Some("input-1"));
    }

    #[test]
    fn synthetic_ids_avoid_author_ids() {
        let page = Page::new();
        let form = page.add(page.body_id(), "form").id();
        let first = page.add(form, "input").id();
        let _ = page.add(form, "input").attr("id", "input-0").id();

        backfill_form_labels(&page).unwrap();
        assert_eq!(page.attribute(&first, "id").as_deref(), Some("input-0-1"));
    }

    #[test]
    fn label_is_inserted_right_before_control() {
        let page = Page::new();
        let form = page.add(page.body_id(), "form").id();
        let input = page.add(form, "select").id();
        backfill_form_labels(&page).unwrap();
        let children = page.children(form);
        assert_eq!(children.len(), 2);
        assert_eq!(page.tag_name(&children[0]), "label");
        assert_eq!(children[1], input);
    }
}
