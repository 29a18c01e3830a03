use crate::render::canvas::{Canvas, Color};
use crate::render::scene::{Geom, Shape, Transform, TransformId};

/// A rendered frame: top-down, row-major RGB pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// The same pixels with an opaque alpha channel appended, for
    /// consumers that want RGBA.
    #[must_use]
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.data.len() / 3 * 4);
        for pixel in self.data.chunks_exact(3) {
            rgba.extend_from_slice(pixel);
            rgba.push(255);
        }
        rgba
    }
}

/// A retained 2D scene drawn onto a software surface. Geometry is added
/// once; per frame the attached transforms are mutated and the scene is
/// redrawn from scratch.
#[derive(Debug)]
pub struct Viewer {
    canvas: Canvas,
    transforms: Vec<Transform>,
    geoms: Vec<Geom>,
}

impl Viewer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            transforms: Vec::new(),
            geoms: Vec::new(),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn add_transform(&mut self, transform: Transform) -> TransformId {
        self.transforms.push(transform);
        TransformId(self.transforms.len() - 1)
    }

    /// # Panics
    ///
    /// Panics if `id` was issued by a different viewer.
    pub fn transform_mut(&mut self, id: TransformId) -> &mut Transform {
        &mut self.transforms[id.0]
    }

    pub fn add_geom(&mut self, geom: Geom) {
        self.geoms.push(geom);
    }

    /// Redraws the whole scene. Returns the frame when asked for a pixel
    /// array; in either case the drawn surface is retained and readable
    /// through [`Viewer::frame`].
    pub fn render(&mut self, return_rgb_array: bool) -> Option<Frame> {
        let Self {
            canvas,
            transforms,
            geoms,
        } = self;
        canvas.clear(Color::WHITE);
        for geom in geoms.iter() {
            let place = |point: (f32, f32)| {
                geom.attrs
                    .iter()
                    .fold(point, |p, id| transforms[id.0].apply(p))
            };
            match &geom.shape {
                Shape::Polygon(vertices) => {
                    let placed: Vec<(f32, f32)> = vertices.iter().map(|&v| place(v)).collect();
                    canvas.fill_polygon(&placed, geom.color);
                }
                Shape::Line(from, to) => {
                    canvas.draw_line(place(*from), place(*to), geom.color);
                }
            }
        }
        return_rgb_array.then(|| self.frame())
    }

    /// The most recently drawn surface as a frame.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            width: self.canvas.width(),
            height: self.canvas.height(),
            data: self.canvas.data().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_frame_has_surface_dimensions() {
        let mut viewer = Viewer::new(60, 40);
        let frame = viewer.render(true).expect("rgb array requested");
        assert_eq!(frame.width, 60);
        assert_eq!(frame.height, 40);
        assert_eq!(frame.data.len(), 60 * 40 * 3);
    }

    #[test]
    fn human_mode_retains_the_frame_without_returning_it() {
        let mut viewer = Viewer::new(16, 16);
        viewer.add_geom(Geom::new(
            Shape::Polygon(vec![(0.0, 0.0), (0.0, 16.0), (16.0, 16.0), (16.0, 0.0)]),
            Color::BLACK,
        ));
        assert!(viewer.render(false).is_none());
        let frame = viewer.frame();
        assert!(frame.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn transforms_move_geometry_between_frames() {
        let mut viewer = Viewer::new(32, 32);
        let mover = viewer.add_transform(Transform::with_translation(4.0, 4.0));
        viewer.add_geom(
            Geom::new(
                Shape::Polygon(vec![(0.0, 0.0), (0.0, 8.0), (8.0, 8.0), (8.0, 0.0)]),
                Color::BLACK,
            )
            .with_attr(mover),
        );
        let first = viewer.render(true).expect("frame");
        viewer.transform_mut(mover).set_translation(20.0, 20.0);
        let second = viewer.render(true).expect("frame");
        assert_ne!(first.data, second.data);
    }

    #[test]
    fn rgba_conversion_appends_opaque_alpha() {
        let frame = Frame {
            width: 1,
            height: 1,
            data: vec![10, 20, 30],
        };
        assert_eq!(frame.to_rgba(), vec![10, 20, 30, 255]);
    }
}
