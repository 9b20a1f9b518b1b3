//! Parsing resource documents into descriptors

use flock_hydra::{parse_descriptor, HydraError, MethodKind, SemanticType};
use serde_json::json;

const IRI: &str = "http://localhost:8081/api/Drone";

#[test]
fn test_parse_compact_operations() {
    let document = json!({
        "@context": {
            "vocab": "http://localhost:8081/api/vocab#",
            "hydra": "http://www.w3.org/ns/hydra/core#"
        },
        "@id": "/api/Drone",
        "@type": "vocab:Drone",
        "hydra:operation": [
            {
                "@type": "hydra:Operation",
                "hydra:method": "GET",
                "hydra:expects": "null",
                "hydra:returns": "vocab:Drone"
            },
            {
                "@type": "http://schema.org/UpdateAction",
                "hydra:method": "POST",
                "hydra:expects": "vocab:Drone",
                "hydra:returns": "null"
            }
        ]
    });

    let descriptor = parse_descriptor(IRI, &document).unwrap();
    assert_eq!(descriptor.iri(), IRI);

    let ops = descriptor.operations();
    assert_eq!(ops.len(), 2);

    assert_eq!(ops[0].method, MethodKind::Retrieve);
    assert_eq!(ops[0].expects, None);
    assert_eq!(
        ops[0].returns,
        Some(SemanticType::new("http://localhost:8081/api/vocab#Drone"))
    );
    assert_eq!(ops[0].operation_type, None);

    assert_eq!(ops[1].method, MethodKind::Update);
    assert_eq!(
        ops[1].expects,
        Some(SemanticType::new("http://localhost:8081/api/vocab#Drone"))
    );
    assert_eq!(ops[1].returns, None);
    assert_eq!(
        ops[1].operation_type,
        Some(SemanticType::new("http://schema.org/UpdateAction"))
    );
}

#[test]
fn test_parse_plain_keys_and_vocab() {
    let document = json!({
        "@context": [
            "http://localhost:8081/api/contexts/Drone.jsonld",
            { "@vocab": "http://localhost:8081/api/vocab#" }
        ],
        "supportedOperation": {
            "method": "GET",
            "returns": { "@id": "Datastream" }
        }
    });

    let descriptor = parse_descriptor(IRI, &document).unwrap();
    assert_eq!(descriptor.operations().len(), 1);
    assert_eq!(
        descriptor.operations()[0].returns,
        Some(SemanticType::new("http://localhost:8081/api/vocab#Datastream"))
    );
}

#[test]
fn test_declaration_order_preserved() {
    let document = json!({
        "operation": [
            { "method": "DELETE" },
            { "method": "PUT", "expects": "http://drone/vocab#Drone" },
            { "method": "GET", "returns": "http://drone/vocab#Drone" }
        ]
    });

    let descriptor = parse_descriptor(IRI, &document).unwrap();
    let methods: Vec<MethodKind> = descriptor.operations().iter().map(|op| op.method).collect();
    assert_eq!(
        methods,
        vec![MethodKind::Delete, MethodKind::Create, MethodKind::Retrieve]
    );
}

#[test]
fn test_unsupported_method_skipped() {
    let document = json!({
        "operation": [
            { "method": "PATCH", "expects": "http://drone/vocab#Drone" },
            { "method": "GET", "returns": "http://drone/vocab#Drone" }
        ]
    });

    let descriptor = parse_descriptor(IRI, &document).unwrap();
    assert_eq!(descriptor.operations().len(), 1);
    assert_eq!(descriptor.operations()[0].method, MethodKind::Retrieve);
}

#[test]
fn test_document_without_operations() {
    let descriptor = parse_descriptor(IRI, &json!({ "@id": "/api/Drone" })).unwrap();
    assert!(descriptor.operations().is_empty());
}

#[test]
fn test_operation_without_method_is_invalid() {
    let document = json!({ "operation": [ { "returns": "vocab:Drone" } ] });
    match parse_descriptor(IRI, &document) {
        Err(HydraError::InvalidDocument { iri, reason }) => {
            assert_eq!(iri, IRI);
            assert!(reason.contains("method"));
        }
        other => panic!("Expected InvalidDocument, got {:?}", other),
    }
}

#[test]
fn test_non_object_document_is_invalid() {
    assert!(matches!(
        parse_descriptor(IRI, &json!([1, 2, 3])),
        Err(HydraError::InvalidDocument { .. })
    ));
    assert!(matches!(
        parse_descriptor(IRI, &json!({ "operation": "GET" })),
        Err(HydraError::InvalidDocument { .. })
    ));
}
