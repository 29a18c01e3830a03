use std::f32::consts::TAU;

use crate::render::canvas::Color;

/// A 2D affine attachment: rotation about the origin followed by a
/// translation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub translation: (f32, f32),
    pub rotation: f32,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_translation(x: f32, y: f32) -> Self {
        Self {
            translation: (x, y),
            rotation: 0.0,
        }
    }

    pub fn set_translation(&mut self, x: f32, y: f32) {
        self.translation = (x, y);
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    #[must_use]
    pub fn apply(&self, point: (f32, f32)) -> (f32, f32) {
        let (sin, cos) = self.rotation.sin_cos();
        (
            cos * point.0 - sin * point.1 + self.translation.0,
            sin * point.0 + cos * point.1 + self.translation.1,
        )
    }
}

/// Handle to a transform owned by a viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformId(pub(crate) usize);

#[derive(Clone, Debug)]
pub enum Shape {
    /// Filled simple polygon; vertices in drawing order.
    Polygon(Vec<(f32, f32)>),
    /// One-pixel-wide line segment.
    Line((f32, f32), (f32, f32)),
}

impl Shape {
    /// A filled circle approximated by a regular polygon.
    #[must_use]
    pub fn circle(radius: f32, resolution: usize) -> Self {
        let vertices = (0..resolution)
            .map(|i| {
                let angle = TAU * (i as f32) / (resolution as f32);
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Shape::Polygon(vertices)
    }
}

/// A persistent scene element: a shape, its color and the ordered list of
/// transforms applied to it each frame (innermost first).
#[derive(Clone, Debug)]
pub struct Geom {
    pub shape: Shape,
    pub color: Color,
    pub attrs: Vec<TransformId>,
}

impl Geom {
    #[must_use]
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            attrs: Vec::new(),
        }
    }

    /// Attaches a transform; transforms are applied in attachment order.
    #[must_use]
    pub fn with_attr(mut self, transform: TransformId) -> Self {
        self.attrs.push(transform);
        self
    }
}
