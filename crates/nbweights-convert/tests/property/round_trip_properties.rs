use nbweights_convert::export::{read_weights_json, write_weights_json};
use nbweights_convert::literal::evaluate_line;
use nbweights_core::{WeightCollection, WeightTensor};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = WeightTensor> {
    prop_oneof![
        any::<i32>().prop_map(|v| WeightTensor::Int(v as i64)),
        (-1.0e6f64..1.0e6).prop_map(WeightTensor::Float),
    ]
}

fn tensor() -> impl Strategy<Value = WeightTensor> {
    leaf().prop_recursive(3, 32, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(WeightTensor::Nested)
    })
}

fn collection() -> impl Strategy<Value = WeightCollection> {
    prop::collection::vec(tensor(), 0..5).prop_map(WeightCollection::from)
}

/// Render a tensor as Python literal source.
fn to_source(tensor: &WeightTensor) -> String {
    match tensor {
        WeightTensor::Int(v) => v.to_string(),
        WeightTensor::Float(v) => format!("{v:?}"),
        WeightTensor::Nested(items) => {
            let parts: Vec<String> = items.iter().map(to_source).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

/// Numeric equality up to float parsing error.
fn approx_eq(a: &WeightTensor, b: &WeightTensor) -> bool {
    match (a, b) {
        (WeightTensor::Nested(x), WeightTensor::Nested(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| approx_eq(p, q))
        }
        (WeightTensor::Nested(_), _) | (_, WeightTensor::Nested(_)) => false,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(p), Some(q)) => (p - q).abs() <= 1e-12 * p.abs().max(1.0),
            _ => false,
        },
    }
}

proptest! {
    #[test]
    fn json_round_trip_preserves_values(weights in collection(), pretty in any::<bool>()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        write_weights_json(&weights, &path, pretty).unwrap();
        let read = read_weights_json(&path).unwrap();
        prop_assert_eq!(read.len(), weights.len());
        for (r, w) in read.iter().zip(weights.iter()) {
            prop_assert!(approx_eq(r, w), "{:?} != {:?}", r, w);
        }
    }

    #[test]
    fn literal_source_evaluates_to_itself(weights in collection()) {
        let source = to_source(&WeightTensor::Nested(weights.0.clone()));
        let line = format!("{source}  # model.get_weights()\n");
        let evaluated = evaluate_line(&line).unwrap();
        prop_assert_eq!(evaluated, weights);
    }

    #[test]
    fn evaluation_never_panics(line in ".{0,80}") {
        let _ = evaluate_line(&line);
    }
}
