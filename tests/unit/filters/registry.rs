use super::*;

#[test]
fn default_catalog_is_ordered_and_parsed() {
    let reg = FilterRegistry::default();
    let names: Vec<_> = reg.list().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["Normal", "Mono", "Sepia", "Cool", "Warm", "Retro", "Blur"]
    );
    assert!(reg.chain(0).unwrap().is_identity());
    assert_eq!(reg.chain(3).unwrap().ops().len(), 2);
    assert_eq!(reg.chain(3).unwrap().source(), reg.get(3).unwrap().expression);

    let chains = parse_catalog(&default_specs()).unwrap();
    for (i, chain) in chains.iter().enumerate() {
        let spec = reg.get(i).unwrap();
        assert_eq!(chain.source(), spec.expression);
        assert_eq!(chain.is_identity(), spec.expression == "none");
    }
}

#[test]
fn get_out_of_range_reports_index_and_len() {
    let reg = FilterRegistry::default();
    let err = reg.get(7).unwrap_err();
    assert!(matches!(err, BoothError::IndexOutOfRange { index: 7, len: 7 }));
    assert!(reg.chain(99).is_err());
}

#[test]
fn position_is_case_insensitive() {
    let reg = FilterRegistry::default();
    assert_eq!(reg.position("sepia"), Some(2));
    assert_eq!(reg.position("vivid"), None);
}

#[test]
fn new_rejects_bad_catalogs() {
    assert!(FilterRegistry::new(Vec::new()).is_err());
    assert!(
        FilterRegistry::new(vec![
            FilterSpec::new("A", "none"),
            FilterSpec::new("A", "sepia(1)"),
        ])
        .is_err()
    );
    let err = FilterRegistry::new(vec![FilterSpec::new("Odd", "sparkle(3)")]).unwrap_err();
    assert!(err.to_string().contains("Odd"));
    assert!(FilterRegistry::new(vec![FilterSpec::new(" ", "none")]).is_err());
}

#[test]
fn spec_deserializes_from_json() {
    let spec: FilterSpec =
        serde_json::from_str(r#"{"name":"Pop","expression":"saturate(200%)"}"#).unwrap();
    assert_eq!(spec, FilterSpec::new("Pop", "saturate(200%)"));
    let reg = FilterRegistry::new(vec![spec]).unwrap();
    assert_eq!(reg.len(), 1);
}
