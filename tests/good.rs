use dataconv::{
    EncodingConfig, ErrorKind, JsonDecoder, JsonEncoder, Value, XmlDecoder, XmlEncoder,
    from_json_str, from_xml_str,
};

const BOOKSTORE_XML: &str = include_str!("fixtures/bookstore.xml");
const BOOKSTORE_JSON: &str = include_str!("fixtures/bookstore.json");
const PROFILE_JSON: &str = include_str!("fixtures/profile.json");
const PROFILE_XML: &str = include_str!("fixtures/profile.xml");

fn assert_same_lines(actual: &str, expected: &str) {
    for (i, (a, e)) in actual.lines().zip(expected.lines()).enumerate() {
        assert_eq!(a, e, "line {} differs", i + 1);
    }
    assert_eq!(actual.lines().count(), expected.lines().count());
}

#[test]
fn test_decode_bookstore() {
    let tree = XmlDecoder::new().decode(BOOKSTORE_XML).unwrap();
    let expected = from_json_str(BOOKSTORE_JSON).unwrap();

    assert_eq!(Value::Map(tree), expected);
}

#[test]
fn test_decode_bookstore_order() {
    let tree = from_xml_str(BOOKSTORE_XML).unwrap();
    let keys: Vec<_> = tree.keys().map(String::as_str).collect();

    assert_eq!(
        keys,
        ["@name", "@open", "book", "notes", "address", "empty"]
    );
}

#[test]
fn test_decoded_attributes_do_not_encode() {
    let tree = from_xml_str(BOOKSTORE_XML).unwrap();
    let encoder = XmlEncoder::new(EncodingConfig::default()).unwrap();

    let err = encoder.encode_map(&tree).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidKey(ref key) if key == "@name"));
}

#[test]
fn test_encode_profile() {
    let tree = JsonDecoder::new().decode(PROFILE_JSON).unwrap();
    let config = EncodingConfig::default()
        .with_root_element("profile")
        .with_null_as_xsi_nil(true)
        .with_bool_as_string(true);

    let xml = XmlEncoder::new(config).unwrap().encode_to_string(&tree).unwrap();
    assert_same_lines(&xml, PROFILE_XML);
}

#[test]
fn test_decode_profile() {
    let tree = from_xml_str(PROFILE_XML).unwrap();
    let item = |year: &str, role: &str| {
        Value::from(serde_json::json!({"year": year, "role": role}))
    };

    assert_eq!(tree["name"], Value::from("Alice"));
    assert_eq!(tree["age"], Value::from("30"));
    assert_eq!(tree["score"], Value::from("4.5"));
    assert_eq!(tree["active"], Value::from("true"));
    assert_eq!(tree["nickname"], Value::Map(Default::default()));
    assert_eq!(
        tree["skills"],
        Value::from(serde_json::json!({"item0": "PHP", "item1": "XML"}))
    );
    assert_eq!(tree["address"].get("zip_code"), Some(&Value::from("12345")));
    assert_eq!(tree["history"].get("item0"), Some(&item("2020", "dev")));
    assert_eq!(tree["history"].get("item1"), Some(&item("2023", "lead")));
}

#[test]
fn test_json_pretty_roundtrip() {
    let tree = from_json_str(BOOKSTORE_JSON).unwrap();
    let json = JsonEncoder::new().encode(&tree).unwrap();

    assert!(json.starts_with("{\n    \"@name\": \"Corner Books\","));
    assert_eq!(from_json_str(&json).unwrap(), tree);
}
