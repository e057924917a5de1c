//! Form definitions: the UI layout published next to the parameter schemas.
//!
//! Parameters are laid out in declaration order. Consecutive parameters that
//! share a display group are wrapped in a single fieldset.

use serde::Serialize;

use crate::types::ParameterDescriptor;

/// Item type of a display group.
pub const FIELDSET: &str = "fieldset";

/// A structured form item: a field with a display type, or a fieldset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormField {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub display_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FormItem>,
}

/// One entry of a form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormItem {
    /// Bare property name; the renderer picks the widget.
    Key(String),
    Field(FormField),
}

impl FormItem {
    /// Item for a single parameter.
    pub fn for_parameter(pd: &ParameterDescriptor) -> Self {
        if pd.display_type.is_empty() {
            FormItem::Key(pd.name.clone())
        } else {
            FormItem::Field(FormField {
                key: pd.name.clone(),
                display_type: pd.display_type.clone(),
                ..FormField::default()
            })
        }
    }

    pub fn fieldset(title: &str, items: Vec<FormItem>) -> Self {
        FormItem::Field(FormField {
            title: title.to_string(),
            display_type: FIELDSET.to_string(),
            items,
            ..FormField::default()
        })
    }

    pub fn is_fieldset(&self) -> bool {
        matches!(self, FormItem::Field(f) if f.display_type == FIELDSET)
    }
}

/// Lay out a parameter list.
pub fn create_form_definition(params: &[ParameterDescriptor]) -> Vec<FormItem> {
    let mut definition = Vec::new();
    let mut idx = 0;

    while idx < params.len() {
        let pd = &params[idx];
        if pd.display_group.is_empty() {
            definition.push(FormItem::for_parameter(pd));
            idx += 1;
        } else {
            let (group, consumed) = create_form_group(&params[idx..], &pd.display_group);
            definition.push(group);
            idx += consumed;
        }
    }

    definition
}

/// Lay out the updatable parameters only.
///
/// Filtering happens before grouping, so parameters separated only by
/// non-updatable ones end up in the same fieldset.
pub fn create_update_form_definition(params: &[ParameterDescriptor]) -> Vec<FormItem> {
    let updatable: Vec<ParameterDescriptor> =
        params.iter().filter(|pd| pd.updatable).cloned().collect();
    create_form_definition(&updatable)
}

/// Wrap the leading run of `params` labelled `group` in a fieldset.
///
/// Returns the fieldset and the number of parameters it consumed.
fn create_form_group(params: &[ParameterDescriptor], group: &str) -> (FormItem, usize) {
    let items: Vec<FormItem> = params
        .iter()
        .take_while(|pd| pd.display_group == group)
        .map(FormItem::for_parameter)
        .collect();
    let consumed = items.len();
    (FormItem::fieldset(group, items), consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param(name: &str) -> ParameterDescriptor {
        ParameterDescriptor::new(name, "string")
    }

    fn grouped(name: &str, group: &str) -> ParameterDescriptor {
        let mut pd = param(name);
        pd.display_group = group.to_string();
        pd
    }

    #[test]
    fn empty_list_gives_empty_definition() {
        assert!(create_form_definition(&[]).is_empty());
    }

    #[test]
    fn bare_names_and_display_types() {
        let mut password = param("password");
        password.display_type = "password".into();
        let items = create_form_definition(&[param("user"), password]);

        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!(["user", { "key": "password", "type": "password" }])
        );
    }

    #[test]
    fn contiguous_group_becomes_one_fieldset() {
        let params = vec![
            grouped("db_host", "Database"),
            grouped("db_port", "Database"),
            grouped("db_user", "Database"),
            grouped("db_pass", "Database"),
            param("app_name"),
        ];
        let items = create_form_definition(&params);

        assert_eq!(items.len(), 2);
        assert!(items[0].is_fieldset());
        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!([
                {
                    "title": "Database",
                    "type": "fieldset",
                    "items": ["db_host", "db_port", "db_user", "db_pass"]
                },
                "app_name"
            ])
        );
    }

    #[test]
    fn changed_label_closes_group() {
        let params = vec![
            grouped("a", "One"),
            grouped("b", "Two"),
            grouped("c", "One"),
        ];
        let items = create_form_definition(&params);
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(FormItem::is_fieldset));
    }

    #[test]
    fn update_definition_filters_before_grouping() {
        let mut a = grouped("a", "Net");
        a.updatable = true;
        let b = param("b");
        let mut c = grouped("c", "Net");
        c.updatable = true;
        let items = create_update_form_definition(&[a, b, c]);

        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!([{ "title": "Net", "type": "fieldset", "items": ["a", "c"] }])
        );
    }
}
