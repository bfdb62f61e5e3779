//! Form normalization - converts shorthand `*_when` expressions to logic blocks

use super::error::FormError;
use super::field::{FormField, LogicAction};
use super::types::{FieldDefinition, FormDefinition};
use crate::engine::condition;
use crate::engine::index::display_order;

/// Normalize a form document into fields sorted by display order
pub fn normalize_form(def: &FormDefinition) -> Result<Vec<FormField>, FormError> {
    let fields = def
        .fields
        .iter()
        .map(normalize_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(display_order(fields))
}

fn normalize_field(def: &FieldDefinition) -> Result<FormField, FormError> {
    let shorthand = [
        (LogicAction::Show, &def.show_when),
        (LogicAction::Hide, &def.hide_when),
        (LogicAction::Require, &def.require_when),
    ];
    let mut declared = shorthand
        .iter()
        .filter_map(|(action, expr)| expr.as_deref().map(|e| (*action, e)));

    let mut field = def.field.clone();
    let Some((action, expr)) = declared.next() else {
        return Ok(field);
    };
    if declared.next().is_some() || field.conditional_logic.is_some() {
        return Err(FormError::ConflictingLogic {
            field: field.id.clone(),
        });
    }

    let logic = condition::parse(expr, action).map_err(|source| FormError::Expression {
        field: field.id.clone(),
        source,
    })?;
    field.conditional_logic = Some(logic);
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::error::ExpressionError;
    use crate::form::field::{Combinator, FieldType, Operator};
    use crate::form::loader::FormLoader;

    #[test]
    fn test_shorthand_becomes_logic_block() {
        let def = FormLoader::parse_yaml(
            r#"
fields:
  - id: age
    type: number
  - id: drinks
    type: dropdown
    options: [beer, wine]
    show_when: "age > 20 and country == 'US'"
"#,
        )
        .unwrap();

        let fields = normalize_form(&def).unwrap();
        let logic = fields[1].conditional_logic.as_ref().unwrap();
        assert_eq!(logic.action, LogicAction::Show);
        assert_eq!(logic.combinator, Combinator::And);
        assert_eq!(logic.conditions.len(), 2);
        assert_eq!(logic.conditions[0].operator, Operator::GreaterThan);
        assert_eq!(logic.conditions[1].value.as_deref(), Some("US"));
    }

    #[test]
    fn test_require_when() {
        let mut field = FieldDefinition::from(FormField::new("phone", FieldType::Text));
        field.require_when = Some("contact_method == 'phone'".into());
        let def = FormDefinition {
            fields: vec![field],
            ..Default::default()
        };

        let fields = normalize_form(&def).unwrap();
        assert_eq!(
            fields[0].conditional_logic.as_ref().unwrap().action,
            LogicAction::Require
        );
    }

    #[test]
    fn test_conflicting_logic_rejected() {
        let mut field = FieldDefinition::from(FormField::new("x", FieldType::Text));
        field.show_when = Some("a == 'b'".into());
        field.hide_when = Some("a == 'c'".into());
        let def = FormDefinition {
            fields: vec![field],
            ..Default::default()
        };

        let result = normalize_form(&def);
        assert!(matches!(result, Err(FormError::ConflictingLogic { .. })));
    }

    #[test]
    fn test_bad_expression_names_field() {
        let mut field = FieldDefinition::from(FormField::new("x", FieldType::Text));
        field.hide_when = Some("a == 'b' or c == 'd' and e == 'f'".into());
        let def = FormDefinition {
            fields: vec![field],
            ..Default::default()
        };

        match normalize_form(&def) {
            Err(FormError::Expression { field, source }) => {
                assert_eq!(field, "x");
                assert_eq!(source, ExpressionError::MixedCombinators);
            }
            other => panic!("Expected expression error, got {:?}", other),
        }
    }

    #[test]
    fn test_sorted_by_order() {
        let def = FormLoader::parse_yaml(
            r#"
fields:
  - { id: c, order: 3 }
  - { id: a, order: 1 }
  - { id: b, order: 1 }
"#,
        )
        .unwrap();

        let ids: Vec<String> = normalize_form(&def)
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
