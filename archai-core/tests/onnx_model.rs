//! Tests for the tract-backed ONNX classifier.
//!
//! The models are tiny graphs built in place: the mean pixel value goes
//! through one dense layer and a softmax, so the winning style is known in
//! advance (bright images score the last style, dark images the first).

#![cfg(feature = "onnx")]

use std::path::{Path, PathBuf};

use archai_core::{
    ArchError, ClassifierGateway, OnnxClassifier, PredictionService, StyleCatalog, StyleScorer,
    BUILTIN_STYLE_COUNT,
};
use image::{Rgb, RgbImage};
use prost::Message;
use tempfile::TempDir;
use tract_onnx::pb::{
    self, attribute_proto::AttributeType, tensor_proto::DataType,
    tensor_shape_proto::dimension, type_proto,
};

fn float_value(name: &str, dims: &[i64]) -> pb::ValueInfoProto {
    let shape = pb::TensorShapeProto {
        dim: dims
            .iter()
            .map(|&d| pb::tensor_shape_proto::Dimension {
                value: Some(dimension::Value::DimValue(d)),
                ..Default::default()
            })
            .collect(),
    };
    pb::ValueInfoProto {
        name: name.into(),
        r#type: Some(pb::TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: DataType::Float as i32,
                shape: Some(shape),
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn float_tensor(name: &str, dims: &[i64], values: Vec<f32>) -> pb::TensorProto {
    pb::TensorProto {
        name: name.into(),
        dims: dims.to_vec(),
        data_type: DataType::Float as i32,
        float_data: values,
        ..Default::default()
    }
}

fn node(
    op_type: &str,
    inputs: &[&str],
    output: &str,
    attribute: Vec<pb::AttributeProto>,
) -> pb::NodeProto {
    pb::NodeProto {
        op_type: op_type.into(),
        name: output.into(),
        input: inputs.iter().map(|s| s.to_string()).collect(),
        output: vec![output.into()],
        attribute,
        ..Default::default()
    }
}

fn ints_attr(name: &str, ints: Vec<i64>) -> pb::AttributeProto {
    pb::AttributeProto {
        name: name.into(),
        r#type: AttributeType::Ints as i32,
        ints,
        ..Default::default()
    }
}

fn int_attr(name: &str, i: i64) -> pb::AttributeProto {
    pb::AttributeProto {
        name: name.into(),
        r#type: AttributeType::Int as i32,
        i,
        ..Default::default()
    }
}

/// Mean pixel -> dense layer with `classes` outputs -> softmax.
///
/// Logits are `0.4 * i` for a white image and `-0.1 * i` for a black one.
fn write_mean_classifier(dir: &Path, classes: usize) -> PathBuf {
    let n = classes as i64;
    let weight: Vec<f32> = (0..classes).map(|i| 0.5 * i as f32).collect();
    let bias: Vec<f32> = (0..classes).map(|i| -0.1 * i as f32).collect();

    let graph = pb::GraphProto {
        name: "mean_classifier".into(),
        node: vec![
            node(
                "ReduceMean",
                &["image"],
                "mean",
                vec![ints_attr("axes", vec![1, 2, 3]), int_attr("keepdims", 1)],
            ),
            node("Flatten", &["mean"], "flat", vec![int_attr("axis", 1)]),
            node("MatMul", &["flat", "weight"], "logits", vec![]),
            node("Add", &["logits", "bias"], "biased", vec![]),
            node("Softmax", &["biased"], "scores", vec![int_attr("axis", -1)]),
        ],
        initializer: vec![
            float_tensor("weight", &[1, n], weight),
            float_tensor("bias", &[n], bias),
        ],
        input: vec![float_value("image", &[1, 256, 256, 1])],
        output: vec![float_value("scores", &[1, n])],
        ..Default::default()
    };

    let model = pb::ModelProto {
        ir_version: 8,
        producer_name: "archai-tests".into(),
        opset_import: vec![pb::OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        ..Default::default()
    };

    let path = dir.join(format!("mean_{classes}.onnx"));
    std::fs::write(&path, model.encode_to_vec()).unwrap();
    path
}

fn solid(color: u8) -> RgbImage {
    RgbImage::from_pixel(320, 240, Rgb([color, color, color]))
}

#[test]
fn test_loaded_model_reports_output_width() {
    let dir = TempDir::new().unwrap();
    let path = write_mean_classifier(dir.path(), BUILTIN_STYLE_COUNT);

    let model = OnnxClassifier::load(&path).unwrap();
    assert_eq!(model.output_len(), Some(BUILTIN_STYLE_COUNT));
    assert_eq!(model.path(), path.as_path());
    assert!(model.describe().starts_with("onnx("));
}

#[test]
fn test_scores_are_a_probability_distribution() {
    let dir = TempDir::new().unwrap();
    let catalog = StyleCatalog::builtin();
    let gateway =
        ClassifierGateway::load_onnx(&write_mean_classifier(dir.path(), 25), &catalog).unwrap();

    let tensor = archai_core::ImageNormalizer::new()
        .normalize(&solid(200))
        .unwrap();
    let scores = gateway.score(&tensor.into_batch()).unwrap();

    assert_eq!(scores.len(), 25);
    assert!(scores.as_slice().iter().all(|s| s.is_finite() && *s > 0.0));
    let total: f32 = scores.as_slice().iter().sum();
    assert!((total - 1.0).abs() < 1e-4, "scores sum to {total}");
}

#[test]
fn test_model_output_decodes_to_expected_style() {
    let dir = TempDir::new().unwrap();
    let catalog = StyleCatalog::builtin();
    let gateway =
        ClassifierGateway::load_onnx(&write_mean_classifier(dir.path(), 25), &catalog).unwrap();
    let service = PredictionService::new(gateway, catalog);

    let bright = service.classify(&solid(255)).unwrap();
    assert_eq!(bright.index, 24);
    assert_eq!(bright.style.name, "Arquitectura neotudor");

    let dark = service.classify(&solid(0)).unwrap();
    assert_eq!(dark.index, 0);
    assert_eq!(dark.style.name, "Arquitectura aquemenida");
    assert!(bright.confidence > dark.confidence);
}

#[test]
fn test_narrow_model_is_rejected_at_load() {
    let dir = TempDir::new().unwrap();
    let path = write_mean_classifier(dir.path(), 24);

    let err = ClassifierGateway::load_onnx(&path, &StyleCatalog::builtin()).unwrap_err();
    assert!(matches!(
        err,
        ArchError::CatalogMismatch {
            scores: 24,
            styles: 25
        }
    ));
}

#[test]
fn test_shared_model_classifies_concurrently() {
    let dir = TempDir::new().unwrap();
    let catalog = StyleCatalog::builtin();
    let gateway =
        ClassifierGateway::load_onnx(&write_mean_classifier(dir.path(), 25), &catalog).unwrap();
    let service = PredictionService::new(gateway, catalog);
    let expected = service.classify(&solid(180)).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| service.classify(&solid(180)).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
