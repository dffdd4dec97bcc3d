use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use crate::detection::utils::class_map;
use crate::detection::utils::detection::{DetectionKind, DetectionSet};

#[derive(Serialize, Debug, Clone)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub entry_type: &'static str,
    pub detection_type: &'static str,
    pub class: String,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub enum Report {
    Itemized {
        predictions: Vec<Prediction>,
    },
    Aggregated {
        text: String,
        total: usize,
    },
    Error {
        message: String,
    },
}

impl Report {
    pub fn error<T: Into<String>>(message: T) -> Self {
        Report::Error { message: message.into() }
    }

    /// Structured variant: one entry per detection, confidence rounded to
    /// exactly 4 decimal places.
    pub fn itemized(set: &DetectionSet, names: Option<&HashMap<usize, String>>) -> Self {
        let detection_type = set.kind().map(|kind| kind.json_label()).unwrap_or("None");
        let predictions = set.detections().iter()
            .map(|detection| Prediction {
                entry_type: "detection",
                detection_type,
                class: class_map::class_name(detection.class_index, names),
                confidence: round_confidence(detection.confidence),
            })
            .collect();
        Report::Itemized { predictions }
    }

    /// Conversational variant: per-class counts with mean confidence,
    /// restricted to the three known classes, followed by the total and the
    /// detection-kind label.
    pub fn aggregated(set: &DetectionSet, names: Option<&HashMap<usize, String>>) -> Self {
        let detections = set.detections();
        let kind_label = set.kind().map(DetectionKind::report_label).unwrap_or("None");
        let mut text = String::new();
        if detections.is_empty() {
            text.push_str("RESULTADO: No se detectaron enfermedades en la imagen.\n");
        } else {
            text.push_str("DETECCIONES ENCONTRADAS:\n");
            for known_name in class_map::known_class_names() {
                let confidences = detections.iter()
                    .filter(|detection| class_map::class_name(detection.class_index, names) == known_name)
                    .map(|detection| detection.confidence)
                    .collect::<Vec<f32>>();
                if confidences.is_empty() {
                    continue;
                }
                let mean = confidences.iter().sum::<f32>() / confidences.len() as f32;
                text.push_str(&format!(
                    "{}: {} detección(es) (conf: {:.2})\n",
                    known_name, confidences.len(), mean
                ));
            }
        }
        text.push_str(&format!("\nTotal de detecciones: {}", detections.len()));
        text.push_str(&format!("\nTipo de detección: {}", kind_label));
        Report::Aggregated { text, total: detections.len() }
    }

    pub fn detection_count(&self) -> usize {
        match self {
            Report::Itemized { predictions } => predictions.len(),
            Report::Aggregated { total, .. } => *total,
            Report::Error { .. } => 0,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Report::Itemized { predictions } => {
                if predictions.is_empty() {
                    json!({
                        "message": "No detections found",
                        "predictions": [],
                        "info": "Model ran successfully but found nothing.",
                    })
                } else {
                    json!({ "predictions": predictions })
                }
            },
            Report::Aggregated { text, .. } => json!({ "text": text }),
            Report::Error { message } => json!({ "error": message }),
        }
    }
}

fn round_confidence(confidence: f32) -> f64 {
    (confidence as f64 * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::utils::detection::{BoundingBox, Detection, Geometry, OrientedBox};

    fn axis_detection(class_index: usize, confidence: f32) -> Detection {
        Detection {
            class_index,
            confidence,
            geometry: Geometry::Axis(BoundingBox { xmin: 0.0, ymin: 0.0, xmax: 5.0, ymax: 5.0 }),
        }
    }

    fn oriented_detection(class_index: usize, confidence: f32) -> Detection {
        Detection {
            class_index,
            confidence,
            geometry: Geometry::Oriented(OrientedBox { cx: 4.0, cy: 4.0, width: 2.0, height: 2.0, angle: 0.3 }),
        }
    }

    #[test]
    fn itemized_report_lists_each_detection() {
        let set = DetectionSet::Axis(vec![axis_detection(0, 0.9001), axis_detection(0, 0.8)]);
        let report = Report::itemized(&set, None);
        match &report {
            Report::Itemized { predictions } => {
                assert_eq!(predictions.len(), 2);
                assert!(predictions.iter().all(|prediction| prediction.class == "Fitoftora"));
                assert!(predictions.iter().all(|prediction| prediction.detection_type == "Standard"));
                assert_eq!(predictions[0].confidence, 0.9001);
                assert_eq!(predictions[1].confidence, 0.8);
            },
            _ => panic!("expected itemized report"),
        }
    }

    #[test]
    fn itemized_confidences_are_rounded_to_four_decimals() {
        let set = DetectionSet::Oriented(vec![oriented_detection(2, 0.123456)]);
        let report = Report::itemized(&set, None);
        let json = report.to_json();
        let confidence = json["predictions"][0]["confidence"].as_f64().unwrap();
        assert_eq!(confidence, 0.1235);
        assert!((0.0..=1.0).contains(&confidence));
        assert_eq!(json["predictions"][0]["detection_type"], "OBB");
    }

    #[test]
    fn itemized_zero_detections_carries_message() {
        let report = Report::itemized(&DetectionSet::Empty, None);
        let json = report.to_json();
        assert_eq!(json["message"], "No detections found");
        assert_eq!(json["predictions"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn aggregated_report_matches_expected_line() {
        let set = DetectionSet::Oriented(vec![oriented_detection(1, 0.873)]);
        let report = Report::aggregated(&set, None);
        match &report {
            Report::Aggregated { text, .. } => {
                assert!(text.contains("Monilia: 1 detección(es) (conf: 0.87)"));
                assert!(text.contains("Total de detecciones: 1"));
                assert!(text.contains("Tipo de detección: OBB (Cajas Orientadas)"));
            },
            _ => panic!("expected aggregated report"),
        }
    }

    #[test]
    fn aggregated_report_averages_per_class_and_omits_absent_classes() {
        let set = DetectionSet::Axis(vec![
            axis_detection(0, 0.9),
            axis_detection(0, 0.7),
            axis_detection(2, 0.6),
        ]);
        let report = Report::aggregated(&set, None);
        match &report {
            Report::Aggregated { text, .. } => {
                assert!(text.contains("Fitoftora: 2 detección(es) (conf: 0.80)"));
                assert!(text.contains("Sana: 1 detección(es) (conf: 0.60)"));
                assert!(!text.contains("Monilia"));
                assert!(text.contains("Total de detecciones: 3"));
                assert!(text.contains("Tipo de detección: Standard"));
            },
            _ => panic!("expected aggregated report"),
        }
    }

    #[test]
    fn aggregated_zero_detections_states_no_findings() {
        let report = Report::aggregated(&DetectionSet::Empty, None);
        match &report {
            Report::Aggregated { text, .. } => {
                assert!(text.contains("No se detectaron enfermedades"));
                assert!(text.contains("Total de detecciones: 0"));
            },
            _ => panic!("expected aggregated report"),
        }
    }

    #[test]
    fn unknown_class_counts_toward_total_only() {
        let set = DetectionSet::Axis(vec![axis_detection(0, 0.9), axis_detection(5, 0.8)]);
        let report = Report::aggregated(&set, None);
        match &report {
            Report::Aggregated { text, .. } => {
                assert!(text.contains("Fitoftora: 1 detección(es)"));
                assert!(text.contains("Total de detecciones: 2"));
            },
            _ => panic!("expected aggregated report"),
        }
    }

    #[test]
    fn error_report_serializes_error_field() {
        let report = Report::error("Model is not available");
        let json = report.to_json();
        assert!(json["error"].as_str().unwrap().to_lowercase().contains("available"));
        assert!(json.to_string().contains("error"));
    }
}
