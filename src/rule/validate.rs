use super::types::{AppliesTo, Field, FieldError, FieldErrorKind, TaxRule, TaxRuleInput};
use crate::catalog::{CatalogIndex, ItemId};

/// Largest accepted percentage; 100% is a rate of 1.0.
const MAX_RATE_PERCENT: f64 = 100.0;

type Check = fn(&TaxRuleInput, &CatalogIndex) -> Option<FieldError>;

/// One check per field, run in this order. Each check sees the whole input
/// but reports at most one error for its own field.
const RULES: &[(Field, Check)] = &[
    (Field::Name, check_name),
    (Field::Rate, check_rate),
    (Field::Items, check_items),
];

/// Validate a form draft against `catalog`.
///
/// Every field is checked; the error list contains one entry per failing
/// field, in form order. On success the rule is normalized:
/// - `All` applies to every catalog id, whatever is selected
/// - `SomeSelected` applies to the selection, in catalog order
/// - the percentage becomes a fraction and the name is trimmed
pub fn validate(
    input: &TaxRuleInput,
    catalog: &CatalogIndex,
) -> Result<TaxRule, Vec<FieldError>> {
    let errors: Vec<FieldError> = RULES
        .iter()
        .filter_map(|(field, check)| {
            let error = check(input, catalog);
            debug_assert!(error.as_ref().map_or(true, |e| e.field == *field));
            error
        })
        .collect();

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "Tax rule rejected");
        return Err(errors);
    }

    let percent = match parse_rate(&input.rate) {
        Ok(percent) => percent,
        Err(kind) => return Err(vec![FieldError::new(Field::Rate, kind)]),
    };

    Ok(TaxRule {
        item_ids: resolve_items(input, catalog),
        applies_to: input.applies_to,
        name: input.name.trim().to_string(),
        rate: percent / 100.0,
    })
}

/// Ids the rule would apply to, given its scope.
pub fn resolve_items(input: &TaxRuleInput, catalog: &CatalogIndex) -> Vec<ItemId> {
    match input.applies_to {
        AppliesTo::All => catalog.ids(),
        AppliesTo::SomeSelected => input.selection.in_catalog_order(catalog),
    }
}

/// Parse the rate field as a whole-number percentage in `(0, 100]`.
pub fn parse_rate(text: &str) -> Result<f64, FieldErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FieldErrorKind::Required);
    }

    let value: f64 = text.parse().map_err(|_| FieldErrorKind::NotANumber)?;
    if !value.is_finite() {
        return Err(FieldErrorKind::NotANumber);
    }
    if value <= 0.0 {
        return Err(FieldErrorKind::MustBePositive);
    }
    if value.fract() != 0.0 {
        return Err(FieldErrorKind::MustBeInteger);
    }
    if value > MAX_RATE_PERCENT {
        return Err(FieldErrorKind::ExceedsMaximum);
    }
    Ok(value)
}

fn check_name(input: &TaxRuleInput, _: &CatalogIndex) -> Option<FieldError> {
    input
        .name
        .trim()
        .is_empty()
        .then(|| FieldError::new(Field::Name, FieldErrorKind::Required))
}

fn check_rate(input: &TaxRuleInput, _: &CatalogIndex) -> Option<FieldError> {
    parse_rate(&input.rate)
        .err()
        .map(|kind| FieldError::new(Field::Rate, kind))
}

fn check_items(input: &TaxRuleInput, catalog: &CatalogIndex) -> Option<FieldError> {
    resolve_items(input, catalog)
        .is_empty()
        .then(|| FieldError::new(Field::Items, FieldErrorKind::MinimumSelection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{toggle_item, SelectionState};
    use pretty_assertions::assert_eq;

    fn selected(catalog: &CatalogIndex, ids: &[ItemId]) -> SelectionState {
        ids.iter().fold(SelectionState::new(), |s, &id| {
            toggle_item(&s, catalog, id).unwrap()
        })
    }

    fn input(name: &str, rate: &str, applies_to: &str, selection: SelectionState) -> TaxRuleInput {
        TaxRuleInput {
            name: name.to_string(),
            rate: rate.to_string(),
            applies_to: AppliesTo::from_form_value(applies_to),
            selection,
        }
    }

    #[test]
    fn test_blank_name_only_error() {
        let catalog = CatalogIndex::sample();
        let draft = input("", "5", "specific", selected(&catalog, &[14865]));
        let errors = validate(&draft, &catalog).unwrap_err();
        assert_eq!(errors, vec![FieldError::new(Field::Name, FieldErrorKind::Required)]);
        assert_eq!(errors[0].message, "Tax Name is required");
    }

    #[test]
    fn test_whitespace_name_is_blank() {
        let catalog = CatalogIndex::sample();
        let draft = input("   ", "5", "all", SelectionState::new());
        let errors = validate(&draft, &catalog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Name);
    }

    #[test]
    fn test_all_scope_uses_whole_catalog() {
        let catalog = CatalogIndex::sample();
        let draft = input("VAT", "7", "all", SelectionState::new());
        let rule = validate(&draft, &catalog).unwrap();
        assert_eq!(
            rule,
            TaxRule {
                item_ids: vec![14864, 14865, 14867, 14870, 14868, 14872, 14873],
                applies_to: AppliesTo::All,
                name: "VAT".to_string(),
                rate: 0.07,
            }
        );
    }

    #[test]
    fn test_all_scope_ignores_selection() {
        let catalog = CatalogIndex::sample();
        let draft = input("VAT", "7", "all", selected(&catalog, &[14870]));
        let rule = validate(&draft, &catalog).unwrap();
        assert_eq!(rule.item_ids.len(), 7);
    }

    #[test]
    fn test_specific_scope_uses_selection_in_catalog_order() {
        let catalog = CatalogIndex::sample();
        let draft = input(" GST ", "10", "specific", selected(&catalog, &[14873, 14868, 14870]));
        let rule = validate(&draft, &catalog).unwrap();
        assert_eq!(rule.item_ids, vec![14870, 14868, 14873]);
        assert_eq!(rule.applies_to, AppliesTo::SomeSelected);
        assert_eq!(rule.name, "GST");
        assert_eq!(rule.rate, 0.1);
    }

    #[test]
    fn test_unknown_scope_value_means_some() {
        assert_eq!(AppliesTo::from_form_value("everything"), AppliesTo::SomeSelected);
        assert_eq!(AppliesTo::from_form_value("ALL"), AppliesTo::SomeSelected);
        assert_eq!(AppliesTo::from_form_value("all"), AppliesTo::All);
    }

    #[test]
    fn test_rate_errors() {
        assert_eq!(parse_rate(""), Err(FieldErrorKind::Required));
        assert_eq!(parse_rate("  "), Err(FieldErrorKind::Required));
        assert_eq!(parse_rate("seven"), Err(FieldErrorKind::NotANumber));
        assert_eq!(parse_rate("NaN"), Err(FieldErrorKind::NotANumber));
        assert_eq!(parse_rate("inf"), Err(FieldErrorKind::NotANumber));
        assert_eq!(parse_rate("-3"), Err(FieldErrorKind::MustBePositive));
        assert_eq!(parse_rate("0"), Err(FieldErrorKind::MustBePositive));
        assert_eq!(parse_rate("-2.5"), Err(FieldErrorKind::MustBePositive));
        assert_eq!(parse_rate("2.5"), Err(FieldErrorKind::MustBeInteger));
        assert_eq!(parse_rate("101"), Err(FieldErrorKind::ExceedsMaximum));
    }

    #[test]
    fn test_rate_accepted() {
        assert_eq!(parse_rate("1"), Ok(1.0));
        assert_eq!(parse_rate(" 7 "), Ok(7.0));
        assert_eq!(parse_rate("7.0"), Ok(7.0));
        assert_eq!(parse_rate("100"), Ok(100.0));
    }

    #[test]
    fn test_negative_rate_reported_on_rate_field() {
        let catalog = CatalogIndex::sample();
        let draft = input("VAT", "-3", "all", SelectionState::new());
        let errors = validate(&draft, &catalog).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new(Field::Rate, FieldErrorKind::MustBePositive)]
        );
    }

    #[test]
    fn test_fractional_rate_reported_on_rate_field() {
        let catalog = CatalogIndex::sample();
        let draft = input("VAT", "2.5", "all", SelectionState::new());
        let errors = validate(&draft, &catalog).unwrap_err();
        assert_eq!(errors[0].kind, FieldErrorKind::MustBeInteger);
        assert_eq!(errors[0].message, "Tax Rate must be an integer");
    }

    #[test]
    fn test_empty_selection_for_specific_scope() {
        let catalog = CatalogIndex::sample();
        let draft = input("VAT", "7", "specific", SelectionState::new());
        let errors = validate(&draft, &catalog).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new(Field::Items, FieldErrorKind::MinimumSelection)]
        );
    }

    #[test]
    fn test_all_scope_on_empty_catalog_fails_minimum_selection() {
        let catalog = CatalogIndex::default();
        let draft = input("VAT", "7", "all", SelectionState::new());
        let errors = validate(&draft, &catalog).unwrap_err();
        assert_eq!(errors[0].kind, FieldErrorKind::MinimumSelection);
    }

    #[test]
    fn test_all_errors_collected_in_field_order() {
        let catalog = CatalogIndex::sample();
        let draft = input("", "", "specific", SelectionState::new());
        let errors = validate(&draft, &catalog).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Rate, Field::Items]);
        assert_eq!(errors[1].message, "Tax Rate is required");
        assert_eq!(errors[2].message, "You must select at least one item");
    }

    #[test]
    fn test_rule_json_field_names() {
        let catalog = CatalogIndex::sample();
        let draft = input("VAT", "7", "specific", selected(&catalog, &[14865, 14867]));
        let rule = validate(&draft, &catalog).unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "applicable items": [14865, 14867],
                "applied to": "some",
                "name": "VAT",
                "rate": 0.07,
            })
        );
    }

    #[test]
    fn test_rule_display_matches_output_panel() {
        let rule = TaxRule {
            item_ids: vec![14865, 14867],
            applies_to: AppliesTo::All,
            name: "VAT".to_string(),
            rate: 0.07,
        };
        assert_eq!(
            rule.to_string(),
            "Applicable Items: 14865, 14867\nApplied To: all\nName: VAT\nRate: 0.07"
        );
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new(Field::Rate, FieldErrorKind::MustBePositive);
        assert_eq!(err.to_string(), "taxRate: Tax Rate must be positive");
    }
}
