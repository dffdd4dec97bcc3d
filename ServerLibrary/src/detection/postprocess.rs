use crate::detection::detector::DetectorTask;
use crate::detection::preprocess::LetterboxParams;
use crate::detection::utils::detection::{BoundingBox, Detection, Geometry, OrientedBox};
use crate::utils::logging::*;

/// Decode one raw model output head into detections in original-image
/// coordinates. An oriented head carries one trailing angle channel after
/// the class scores; everything else matches the axis-aligned layout
/// `[cx, cy, w, h, class scores...]`.
pub fn decode(shape: &[i64], data: &[f32], task: DetectorTask, params: &LetterboxParams,
              confidence_threshold: f32, iou_threshold: f32) -> Result<Vec<Detection>, LogEntry>
{
    if shape.len() != 3 || shape[0] != 1 || shape.iter().any(|&dimension| dimension <= 0) {
        return Err(error_entry!(DetectEntry::InvalidOutputShape(shape.to_vec())));
    }
    let d1 = shape[1] as usize;
    let d2 = shape[2] as usize;
    //Ultralytics exports are feature-major: [1, 4 + nc (+1), anchors].
    let (features, anchors, feature_major) = if d1 < d2 { (d1, d2, true) } else { (d2, d1, false) };
    let extra = match task {
        DetectorTask::Obb => 5_usize,
        DetectorTask::Detect => 4_usize,
    };
    if features <= extra || data.len() != features * anchors {
        return Err(error_entry!(DetectEntry::InvalidOutputShape(shape.to_vec())));
    }
    let class_count = features - extra;
    let value = |feature: usize, anchor: usize| -> f32 {
        if feature_major {
            data[feature * anchors + anchor]
        } else {
            data[anchor * features + feature]
        }
    };

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let mut best_class = 0_usize;
        let mut best_score = f32::NEG_INFINITY;
        for class_index in 0..class_count {
            let score = value(4 + class_index, anchor);
            if score > best_score {
                best_score = score;
                best_class = class_index;
            }
        }
        if !best_score.is_finite() || best_score < confidence_threshold {
            continue;
        }
        let cx = value(0, anchor);
        let cy = value(1, anchor);
        let width = value(2, anchor);
        let height = value(3, anchor);
        if ![cx, cy, width, height].iter().all(|coordinate| coordinate.is_finite())
            || width <= 0.0 || height <= 0.0
        {
            continue;
        }
        let geometry = match task {
            DetectorTask::Obb => {
                let angle = value(4 + class_count, anchor);
                Geometry::Oriented(OrientedBox {
                    cx: (cx - params.pad_x) / params.scale,
                    cy: (cy - params.pad_y) / params.scale,
                    width: width / params.scale,
                    height: height / params.scale,
                    angle,
                })
            },
            DetectorTask::Detect => {
                let original_width = params.original_width as f32;
                let original_height = params.original_height as f32;
                Geometry::Axis(BoundingBox {
                    xmin: (((cx - width / 2.0) - params.pad_x) / params.scale).clamp(0.0, original_width),
                    ymin: (((cy - height / 2.0) - params.pad_y) / params.scale).clamp(0.0, original_height),
                    xmax: (((cx + width / 2.0) - params.pad_x) / params.scale).clamp(0.0, original_width),
                    ymax: (((cy + height / 2.0) - params.pad_y) / params.scale).clamp(0.0, original_height),
                })
            },
        };
        candidates.push(Detection {
            class_index: best_class,
            confidence: best_score,
            geometry,
        });
    }
    Ok(non_maximum_suppression(candidates, iou_threshold))
}

/// Greedy class-aware suppression. Oriented candidates are compared through
/// the IoU of their axis-aligned enclosing boxes.
pub fn non_maximum_suppression(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut kept = Vec::new();
    while !candidates.is_empty() {
        let best = candidates.remove(0);
        let best_box = best.geometry.enclosing();
        candidates.retain(|candidate| {
            candidate.class_index != best.class_index
                || best_box.iou(&candidate.geometry.enclosing()) < iou_threshold
        });
        kept.push(best);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_params() -> LetterboxParams {
        LetterboxParams {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
            original_width: 64,
            original_height: 64,
        }
    }

    fn axis_detection(class_index: usize, confidence: f32, xmin: f32) -> Detection {
        Detection {
            class_index,
            confidence,
            geometry: Geometry::Axis(BoundingBox { xmin, ymin: 0.0, xmax: xmin + 10.0, ymax: 10.0 }),
        }
    }

    /// Builds a feature-major `[1, features, anchors]` tensor from anchor rows.
    fn feature_major(rows: &[Vec<f32>], anchors: usize) -> (Vec<i64>, Vec<f32>) {
        let features = rows[0].len();
        assert!(rows.iter().all(|row| row.len() == features));
        let mut data = vec![0.0_f32; features * anchors];
        for (anchor, row) in rows.iter().enumerate() {
            for (feature, value) in row.iter().enumerate() {
                data[feature * anchors + anchor] = *value;
            }
        }
        (vec![1, features as i64, anchors as i64], data)
    }

    #[test]
    fn nms_keeps_highest_confidence_of_overlapping_pair() {
        let detections = vec![axis_detection(0, 0.8, 1.0), axis_detection(0, 0.9, 0.0)];
        let kept = non_maximum_suppression(detections, 0.45);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn nms_keeps_disjoint_and_cross_class_detections() {
        let detections = vec![
            axis_detection(0, 0.9, 0.0),
            axis_detection(0, 0.8, 40.0),
            axis_detection(1, 0.7, 1.0),
        ];
        let kept = non_maximum_suppression(detections, 0.45);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn decode_reads_axis_head() {
        // Rows: cx, cy, w, h, three class scores.
        let rows = vec![
            vec![32.0, 32.0, 20.0, 10.0, 0.1, 0.9, 0.2],
            vec![10.0, 10.0, 4.0, 4.0, 0.1, 0.1, 0.1],
        ];
        let (shape, data) = feature_major(&rows, 16);
        let detections = decode(&shape, &data, DetectorTask::Detect, &identity_params(), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_index, 1);
        match detections[0].geometry {
            Geometry::Axis(bounding_box) => {
                assert!((bounding_box.xmin - 22.0).abs() < 1e-4);
                assert!((bounding_box.ymax - 37.0).abs() < 1e-4);
            },
            _ => panic!("expected axis geometry"),
        }
    }

    #[test]
    fn decode_reads_oriented_head_with_angle_channel() {
        // Rows: cx, cy, w, h, three class scores, angle.
        let rows = vec![
            vec![32.0, 32.0, 20.0, 10.0, 0.95, 0.1, 0.2, 0.5],
        ];
        let (shape, data) = feature_major(&rows, 16);
        let detections = decode(&shape, &data, DetectorTask::Obb, &identity_params(), 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_index, 0);
        match detections[0].geometry {
            Geometry::Oriented(oriented_box) => {
                assert!((oriented_box.angle - 0.5).abs() < 1e-6);
                assert!((oriented_box.cx - 32.0).abs() < 1e-4);
            },
            _ => panic!("expected oriented geometry"),
        }
    }

    #[test]
    fn decode_applies_letterbox_inverse() {
        let params = LetterboxParams {
            scale: 0.5,
            pad_x: 0.0,
            pad_y: 16.0,
            original_width: 128,
            original_height: 64,
        };
        let rows = vec![vec![32.0, 32.0, 16.0, 8.0, 0.9, 0.0, 0.0]];
        let (shape, data) = feature_major(&rows, 16);
        let detections = decode(&shape, &data, DetectorTask::Detect, &params, 0.25, 0.45).unwrap();
        match detections[0].geometry {
            Geometry::Axis(bounding_box) => {
                assert!((bounding_box.xmin - 48.0).abs() < 1e-3);
                assert!((bounding_box.ymin - 24.0).abs() < 1e-3);
                assert!((bounding_box.xmax - 80.0).abs() < 1e-3);
                assert!((bounding_box.ymax - 40.0).abs() < 1e-3);
            },
            _ => panic!("expected axis geometry"),
        }
    }

    #[test]
    fn decode_rejects_malformed_shape() {
        let result = decode(&[1, 7], &[0.0; 7], DetectorTask::Detect, &identity_params(), 0.25, 0.45);
        assert!(result.is_err());
        let result = decode(&[1, 3, 16], &[0.0; 48], DetectorTask::Detect, &identity_params(), 0.25, 0.45);
        assert!(result.is_err());
    }

    #[test]
    fn low_confidence_candidates_are_dropped() {
        let rows = vec![vec![32.0, 32.0, 20.0, 10.0, 0.2, 0.1, 0.05]];
        let (shape, data) = feature_major(&rows, 16);
        let detections = decode(&shape, &data, DetectorTask::Detect, &identity_params(), 0.25, 0.45).unwrap();
        assert!(detections.is_empty());
    }
}
