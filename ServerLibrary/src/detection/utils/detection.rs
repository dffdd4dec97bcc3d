use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct BoundingBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        (self.xmax - self.xmin).max(0.0) * (self.ymax - self.ymin).max(0.0)
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let inter_xmin = self.xmin.max(other.xmin);
        let inter_ymin = self.ymin.max(other.ymin);
        let inter_xmax = self.xmax.min(other.xmax);
        let inter_ymax = self.ymax.min(other.ymax);
        let intersection = (inter_xmax - inter_xmin).max(0.0) * (inter_ymax - inter_ymin).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// Rotated detection region: center, size and rotation angle in radians.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct OrientedBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl OrientedBox {
    pub fn corners(&self) -> [(f32, f32); 4] {
        let (sin, cos) = self.angle.sin_cos();
        let dx_w = self.width / 2.0 * cos;
        let dy_w = self.width / 2.0 * sin;
        let dx_h = self.height / 2.0 * sin;
        let dy_h = self.height / 2.0 * cos;
        [
            (self.cx - dx_w + dx_h, self.cy - dy_w - dy_h),
            (self.cx + dx_w + dx_h, self.cy + dy_w - dy_h),
            (self.cx + dx_w - dx_h, self.cy + dy_w + dy_h),
            (self.cx - dx_w - dx_h, self.cy - dy_w + dy_h),
        ]
    }

    pub fn enclosing(&self) -> BoundingBox {
        let corners = self.corners();
        let mut bounding_box = BoundingBox {
            xmin: f32::INFINITY,
            ymin: f32::INFINITY,
            xmax: f32::NEG_INFINITY,
            ymax: f32::NEG_INFINITY,
        };
        for (x, y) in corners {
            bounding_box.xmin = bounding_box.xmin.min(x);
            bounding_box.ymin = bounding_box.ymin.min(y);
            bounding_box.xmax = bounding_box.xmax.max(x);
            bounding_box.ymax = bounding_box.ymax.max(y);
        }
        bounding_box
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum Geometry {
    Axis(BoundingBox),
    Oriented(OrientedBox),
}

impl Geometry {
    pub fn enclosing(&self) -> BoundingBox {
        match self {
            Geometry::Axis(bounding_box) => *bounding_box,
            Geometry::Oriented(oriented_box) => oriented_box.enclosing(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Detection {
    pub class_index: usize,
    pub confidence: f32,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKind {
    Oriented,
    Axis,
}

impl DetectionKind {
    pub fn json_label(&self) -> &'static str {
        match self {
            DetectionKind::Oriented => "OBB",
            DetectionKind::Axis => "Standard",
        }
    }

    pub fn report_label(&self) -> &'static str {
        match self {
            DetectionKind::Oriented => "OBB (Cajas Orientadas)",
            DetectionKind::Axis => "Standard",
        }
    }
}

/// The detector's result object for one image: the decoded source picture,
/// at most one of the two detection collections, and the model's native
/// label table when the weights carry one.
#[derive(Debug, Clone)]
pub struct RawDetections {
    pub image: RgbImage,
    pub oriented: Option<Vec<Detection>>,
    pub axis: Option<Vec<Detection>>,
    pub names: Option<HashMap<usize, String>>,
}

/// Which collection a request works with, decided once at normalization
/// entry. Oriented wins only when present and non-empty.
#[derive(Debug, Clone)]
pub enum DetectionSet {
    Oriented(Vec<Detection>),
    Axis(Vec<Detection>),
    Empty,
}

impl DetectionSet {
    pub fn resolve(raw: &RawDetections) -> DetectionSet {
        match (&raw.oriented, &raw.axis) {
            (Some(oriented), _) if !oriented.is_empty() => DetectionSet::Oriented(oriented.clone()),
            (_, Some(axis)) => DetectionSet::Axis(axis.clone()),
            (Some(_), None) => DetectionSet::Empty,
            (None, None) => DetectionSet::Empty,
        }
    }

    pub fn detections(&self) -> &[Detection] {
        match self {
            DetectionSet::Oriented(detections) => detections,
            DetectionSet::Axis(detections) => detections,
            DetectionSet::Empty => &[],
        }
    }

    pub fn kind(&self) -> Option<DetectionKind> {
        match self {
            DetectionSet::Oriented(_) => Some(DetectionKind::Oriented),
            DetectionSet::Axis(_) => Some(DetectionKind::Axis),
            DetectionSet::Empty => None,
        }
    }
}
