use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::collections::HashMap;
use crate::detection::utils::class_map;
use crate::detection::utils::detection::{DetectionSet, Geometry};
use crate::detection::utils::frame::{ChannelOrder, Frame};
use crate::utils::config::Config;

#[derive(Debug, Clone, Copy)]
pub struct AnnotationConfig {
    pub border_width: u32,
    pub border_color: [u8; 3],
    pub text_color: [u8; 3],
    pub font_size: f32,
}

impl From<&Config> for AnnotationConfig {
    fn from(config: &Config) -> Self {
        Self {
            border_width: config.border_width,
            border_color: config.border_color,
            text_color: config.text_color,
            font_size: config.font_size,
        }
    }
}

fn class_color(class_index: usize, fallback: [u8; 3]) -> Rgb<u8> {
    match class_index {
        0 => Rgb([220, 40, 40]),  //Fitoftora
        1 => Rgb([235, 140, 0]),  //Monilia
        2 => Rgb([40, 180, 60]),  //Sana
        _ => Rgb(fallback),
    }
}

/// Draw the resolved detection set over a copy of the source picture. The
/// emitted frame is BGR; callers convert once for the UI side.
pub fn render(image: &RgbImage, set: &DetectionSet, names: Option<&HashMap<usize, String>>,
              font: Option<&FontVec>, annotation: &AnnotationConfig) -> Frame
{
    let mut canvas = image.clone();
    for detection in set.detections() {
        let color = class_color(detection.class_index, annotation.border_color);
        match detection.geometry {
            Geometry::Axis(bounding_box) => {
                draw_axis_box(&mut canvas, bounding_box.xmin, bounding_box.ymin,
                              bounding_box.xmax, bounding_box.ymax, annotation.border_width, color);
            },
            Geometry::Oriented(oriented_box) => {
                draw_oriented_box(&mut canvas, oriented_box.corners(), annotation.border_width, color);
            },
        }
        if let Some(font) = font {
            let label = format!(
                "{} {:.2}",
                class_map::class_name(detection.class_index, names),
                detection.confidence
            );
            let anchor = detection.geometry.enclosing();
            let text_y = (anchor.ymin - annotation.font_size - 2.0).max(0.0) as i32;
            draw_text_mut(
                &mut canvas,
                Rgb(annotation.text_color),
                anchor.xmin.max(0.0) as i32,
                text_y,
                PxScale::from(annotation.font_size),
                font,
                &label,
            );
        }
    }
    Frame::from_image(canvas, ChannelOrder::Bgr)
}

fn draw_axis_box(canvas: &mut RgbImage, xmin: f32, ymin: f32, xmax: f32, ymax: f32,
                 border_width: u32, color: Rgb<u8>)
{
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    let x_min = (xmin.round() as i32).clamp(0, width - 1);
    let y_min = (ymin.round() as i32).clamp(0, height - 1);
    let x_max = (xmax.round() as i32).clamp(0, width - 1);
    let y_max = (ymax.round() as i32).clamp(0, height - 1);
    let box_width = (x_max - x_min).max(1) as u32;
    let box_height = (y_max - y_min).max(1) as u32;
    draw_hollow_rect_mut(canvas, Rect::at(x_min, y_min).of_size(box_width, box_height), color);
    for inset in 1..border_width as i32 {
        let inner_width = box_width.saturating_sub(2 * inset as u32).max(1);
        let inner_height = box_height.saturating_sub(2 * inset as u32).max(1);
        draw_hollow_rect_mut(canvas, Rect::at(x_min + inset, y_min + inset).of_size(inner_width, inner_height), color);
    }
}

fn draw_oriented_box(canvas: &mut RgbImage, corners: [(f32, f32); 4], border_width: u32, color: Rgb<u8>) {
    for inset in 0..border_width {
        let offset = inset as f32 * 0.5;
        for index in 0..4 {
            let (start_x, start_y) = corners[index];
            let (end_x, end_y) = corners[(index + 1) % 4];
            draw_line_segment_mut(canvas, (start_x + offset, start_y), (end_x + offset, end_y), color);
            draw_line_segment_mut(canvas, (start_x, start_y + offset), (end_x, end_y + offset), color);
        }
    }
}
