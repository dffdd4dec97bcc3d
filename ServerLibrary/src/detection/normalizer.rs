use tokio::task::spawn_blocking;
use crate::detection::annotator::{self, AnnotationConfig};
use crate::detection::detector::DetectorHandle;
use crate::detection::utils::detection::{DetectionSet, RawDetections};
use crate::detection::utils::frame::Frame;
use crate::detection::utils::report::Report;
use crate::utils::config::{Config, ReportMode};
use crate::utils::logging::*;
use ab_glyph::FontVec;

/// Turn one raw detector result into what the UI host displays: the
/// annotated frame in the host's channel order plus the report for the
/// configured presentation mode.
pub fn normalize(raw: &RawDetections, mode: ReportMode, annotation: &AnnotationConfig,
                 font: Option<&FontVec>) -> (Frame, Report)
{
    let set = DetectionSet::resolve(raw);
    let frame = annotator::render(&raw.image, &set, raw.names.as_ref(), font, annotation).into_rgb();
    let report = match mode {
        ReportMode::Itemized => Report::itemized(&set, raw.names.as_ref()),
        ReportMode::Aggregated => Report::aggregated(&set, raw.names.as_ref()),
    };
    (frame, report)
}

/// Full request path behind the upload handler. Every failure leg ends in a
/// null frame and an explicit error report; nothing is propagated raw.
pub async fn process(handle: DetectorHandle, image_data: Option<Vec<u8>>,
                     config: &Config) -> (Option<Frame>, Report)
{
    let image_data = match image_data {
        Some(image_data) if !image_data.is_empty() => image_data,
        _ => {
            let entry = error_entry!(DetectEntry::MissingImage);
            let message = entry.message.clone();
            logging_entry!(entry);
            return (None, Report::error(message));
        },
    };
    if handle.detector().is_none() {
        let entry = error_entry!(DetectEntry::ModelUnavailable);
        let message = entry.message.clone();
        logging_entry!(entry);
        return (None, Report::error(message));
    }
    let mode = config.report_mode;
    let annotation = AnnotationConfig::from(config);
    let result = spawn_blocking(move || {
        //Checked above, the handle still owns a detector here.
        let detector = handle.detector().ok_or(error_entry!(DetectEntry::ModelUnavailable))?;
        let raw = detector.predict(&image_data)?;
        Ok(normalize(&raw, mode, &annotation, detector.font()))
    }).await;
    match result {
        Ok(Ok((frame, report))) => (Some(frame), report),
        Ok(Err(entry)) => {
            let message = entry.message.clone();
            logging_entry!(entry);
            (None, Report::error(message))
        },
        Err(join_error) => {
            let entry = error_entry!(SystemEntry::TaskPanickedError(join_error));
            let message = entry.message.clone();
            logging_entry!(entry);
            (None, Report::error(message))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use crate::detection::utils::detection::{BoundingBox, Detection, Geometry, OrientedBox};
    use crate::detection::utils::frame::ChannelOrder;

    fn annotation() -> AnnotationConfig {
        AnnotationConfig {
            border_width: 2,
            border_color: [255, 255, 255],
            text_color: [255, 255, 255],
            font_size: 12.0,
        }
    }

    fn axis_detection(class_index: usize, confidence: f32) -> Detection {
        Detection {
            class_index,
            confidence,
            geometry: Geometry::Axis(BoundingBox { xmin: 2.0, ymin: 2.0, xmax: 20.0, ymax: 20.0 }),
        }
    }

    fn oriented_detection(class_index: usize, confidence: f32) -> Detection {
        Detection {
            class_index,
            confidence,
            geometry: Geometry::Oriented(OrientedBox { cx: 16.0, cy: 16.0, width: 8.0, height: 4.0, angle: 0.2 }),
        }
    }

    #[test]
    fn axis_only_results_use_the_axis_set() {
        let raw = RawDetections {
            image: RgbImage::new(32, 32),
            oriented: None,
            axis: Some(vec![axis_detection(0, 0.9)]),
            names: None,
        };
        let (_, report) = normalize(&raw, ReportMode::Itemized, &annotation(), None);
        let json = report.to_json();
        assert_eq!(json["predictions"][0]["detection_type"], "Standard");
    }

    #[test]
    fn oriented_set_shadows_axis_set() {
        let raw = RawDetections {
            image: RgbImage::new(32, 32),
            oriented: Some(vec![oriented_detection(1, 0.873)]),
            axis: Some(vec![axis_detection(0, 0.5), axis_detection(2, 0.4)]),
            names: None,
        };
        let (_, report) = normalize(&raw, ReportMode::Itemized, &annotation(), None);
        let json = report.to_json();
        let predictions = json["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0]["detection_type"], "OBB");
        assert_eq!(predictions[0]["class"], "Monilia");
    }

    #[test]
    fn aggregated_scenario_emits_expected_line() {
        let raw = RawDetections {
            image: RgbImage::new(32, 32),
            oriented: Some(vec![oriented_detection(1, 0.873)]),
            axis: None,
            names: None,
        };
        let (_, report) = normalize(&raw, ReportMode::Aggregated, &annotation(), None);
        match report {
            Report::Aggregated { text, .. } => {
                assert!(text.contains("Monilia: 1 detección(es) (conf: 0.87)"));
                assert!(text.contains("Total de detecciones: 1"));
            },
            _ => panic!("expected aggregated report"),
        }
    }

    #[test]
    fn zero_detections_still_return_a_frame() {
        let raw = RawDetections {
            image: RgbImage::new(24, 16),
            oriented: None,
            axis: None,
            names: None,
        };
        let (frame, report) = normalize(&raw, ReportMode::Itemized, &annotation(), None);
        assert_eq!(frame.width, 24);
        assert_eq!(frame.height, 16);
        assert_eq!(frame.order, ChannelOrder::Rgb);
        assert_eq!(report.to_json()["message"], "No detections found");
    }

    #[tokio::test]
    async fn missing_detector_yields_error_report_for_any_input() {
        let config = test_config(ReportMode::Itemized);
        let handle = DetectorHandle::new(None);
        let (frame, report) = process(handle.clone(), Some(vec![1, 2, 3]), &config).await;
        assert!(frame.is_none());
        assert!(report.to_json().to_string().to_lowercase().contains("error"));

        let valid_png = {
            let mut bytes = std::io::Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(RgbImage::new(4, 4))
                .write_to(&mut bytes, image::ImageFormat::Png)
                .unwrap();
            bytes.into_inner()
        };
        let (frame, report) = process(handle, Some(valid_png), &config).await;
        assert!(frame.is_none());
        assert!(report.to_json()["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn missing_image_yields_error_report() {
        let config = test_config(ReportMode::Aggregated);
        let handle = DetectorHandle::new(None);
        let (frame, report) = process(handle, None, &config).await;
        assert!(frame.is_none());
        assert!(report.to_json()["error"].as_str().unwrap().contains("No image"));
    }

    fn test_config(report_mode: ReportMode) -> Config {
        let mut config = Config::default();
        config.report_mode = report_mode;
        config.inference_size = 64;
        config
    }
}
