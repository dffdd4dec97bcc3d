use ab_glyph::FontVec;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use crate::detection::postprocess;
use crate::detection::preprocess;
use crate::detection::utils::detection::RawDetections;
use crate::utils::config::Config;
use crate::utils::logging::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorTask {
    Obb,
    Detect,
}

/// The once-loaded model: ONNX session, task flavor, native label table and
/// the label font. Constructed by the manager at startup and shared for the
/// process lifetime; inference calls are serialized on the session mutex.
pub struct Detector {
    session: Mutex<Session>,
    task: DetectorTask,
    names: Option<HashMap<usize, String>>,
    font: Option<FontVec>,
    confidence_threshold: f32,
    iou_threshold: f32,
    inference_size: u32,
}

impl Detector {
    pub fn initialize(config: &Config) -> Result<Self, LogEntry> {
        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(&config.model_path))
            .map_err(|err| error_entry!(DetectEntry::ModelLoadError(config.model_path.clone(), err)))?;
        let (task, names) = match session.metadata() {
            Ok(metadata) => {
                let task = match metadata.custom("task") {
                    Ok(Some(task)) if task == "obb" => DetectorTask::Obb,
                    _ => DetectorTask::Detect,
                };
                let names = match metadata.custom("names") {
                    Ok(Some(names)) => parse_names(&names),
                    _ => None,
                };
                (task, names)
            },
            Err(_) => (DetectorTask::Detect, None),
        };
        let font = Self::load_font(&config.font_path);
        Ok(Self {
            session: Mutex::new(session),
            task,
            names,
            font,
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
            inference_size: config.inference_size,
        })
    }

    fn load_font(font_path: &str) -> Option<FontVec> {
        if !Path::new(font_path).is_file() {
            logging_console!(warning_entry!("Label font not found, boxes are drawn without text"));
            return None;
        }
        match std::fs::read(font_path).map_err(|err| error_entry!(IOEntry::ReadFileError(Path::new(font_path).display(), err))) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => Some(font),
                Err(_) => {
                    logging_console!(warning_entry!("Label font is not a readable font file"));
                    None
                },
            },
            Err(entry) => {
                logging_console!(entry);
                None
            },
        }
    }

    pub fn task(&self) -> DetectorTask {
        self.task
    }

    pub fn font(&self) -> Option<&FontVec> {
        self.font.as_ref()
    }

    /// One full pass over one picture: decode, letterbox, run the session
    /// and project the raw head back into image coordinates.
    pub fn predict(&self, image_data: &[u8]) -> Result<RawDetections, LogEntry> {
        let image = image::load_from_memory(image_data)
            .map_err(|err| error_entry!(DetectEntry::InvalidImage(err)))?
            .to_rgb8();
        let (tensor, params) = preprocess::letterbox(&image, self.inference_size);
        let input = ort::value::Value::from_array(tensor)
            .map_err(|err| error_entry!(DetectEntry::InferenceError(err)))?;
        let detections = {
            let session = self.session.lock()
                .map_err(|_| error_entry!("Inference session lock poisoned"))?;
            let outputs = session.run(ort::inputs![input])
                .map_err(|err| error_entry!(DetectEntry::InferenceError(err)))?;
            let output = outputs.get("output0")
                .or_else(|| outputs.iter().next().map(|(_, value)| value))
                .ok_or(error_entry!("Model produced no output tensor"))?;
            let (shape, data) = output.try_extract_tensor::<f32>()
                .map_err(|err| error_entry!(DetectEntry::InferenceError(err)))?;
            postprocess::decode(shape, data, self.task, &params,
                                self.confidence_threshold, self.iou_threshold)?
        };
        let (oriented, axis) = match self.task {
            DetectorTask::Obb => (Some(detections), None),
            DetectorTask::Detect => (None, Some(detections)),
        };
        Ok(RawDetections {
            image,
            oriented,
            axis,
            names: self.names.clone(),
        })
    }
}

/// Shared handle given to every request handler. A failed model load leaves
/// the handle permanently empty and the server degraded but serving.
#[derive(Clone)]
pub struct DetectorHandle {
    inner: Arc<Option<Detector>>,
}

impl DetectorHandle {
    pub fn new(detector: Option<Detector>) -> Self {
        Self {
            inner: Arc::new(detector),
        }
    }

    pub fn detector(&self) -> Option<&Detector> {
        self.inner.as_ref().as_ref()
    }
}

/// Ultralytics exports embed the label table as a Python-style dict literal,
/// e.g. `{0: 'Fitoftora', 1: 'Monilia', 2: 'Sana'}`.
fn parse_names(raw: &str) -> Option<HashMap<usize, String>> {
    let body = raw.trim().strip_prefix('{')?.strip_suffix('}')?;
    let mut names = HashMap::new();
    for pair in body.split(',') {
        let (index, name) = pair.split_once(':')?;
        let index = index.trim().parse::<usize>().ok()?;
        let name = name.trim().trim_matches(|character| character == '\'' || character == '"');
        names.insert(index, name.to_string());
    }
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}
