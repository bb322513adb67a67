use std::fmt;

use serde::Serialize;

use super::SankeyLayout;

pub const DEFAULT_CURVATURE: f32 = 0.5;

/// Cubic Bezier band centre line from a source node's right edge to a target
/// node's left edge. Both control points share the y of their endpoint, so
/// the band leaves and enters nodes horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePath {
    pub start: (f32, f32),
    pub control1: (f32, f32),
    pub control2: (f32, f32),
    pub end: (f32, f32),
    /// Stroke width of the band.
    pub thickness: f32,
}

impl CurvePath {
    /// Points in drawing order: start, both control points, end.
    pub fn points(&self) -> [(f32, f32); 4] {
        [self.start, self.control1, self.control2, self.end]
    }

    pub fn to_svg_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CurvePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{}C{},{} {},{} {},{}",
            self.start.0,
            self.start.1,
            self.control1.0,
            self.control1.1,
            self.control2.0,
            self.control2.1,
            self.end.0,
            self.end.1
        )
    }
}

fn interpolate(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Curve for link `link_idx`; `None` if there is no such link.
///
/// `curvature` is the fraction of the horizontal span at which the first
/// control point sits (the second mirrors it), `0.5` being a symmetric S.
pub fn curve_path(layout: &SankeyLayout, link_idx: usize, curvature: f32) -> Option<CurvePath> {
    let link = layout.links.get(link_idx)?;
    let source = layout.nodes.get(link.source)?;
    let target = layout.nodes.get(link.target)?;

    let x0 = source.x + source.width;
    let x1 = target.x;
    let x2 = interpolate(x0, x1, curvature);
    let x3 = interpolate(x0, x1, 1.0 - curvature);
    let y0 = source.y + link.source_offset + link.thickness / 2.0;
    let y1 = target.y + link.target_offset + link.thickness / 2.0;

    Some(CurvePath {
        start: (x0, y0),
        control1: (x2, y0),
        control2: (x3, y1),
        end: (x1, y1),
        thickness: link.thickness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{SankeyLink, SankeyNode};

    fn two_node_layout() -> SankeyLayout {
        let mut a = SankeyNode::new("A".to_string(), "A".to_string());
        a.x = 0.0;
        a.width = 10.0;
        a.y = 0.0;
        a.height = 40.0;
        let mut b = SankeyNode::new("B".to_string(), "B".to_string());
        b.x = 110.0;
        b.width = 10.0;
        b.y = 50.0;
        b.height = 20.0;
        let mut link = SankeyLink::new(0, 1, 2.0, None);
        link.thickness = 20.0;
        link.source_offset = 10.0;
        SankeyLayout {
            width: 120.0,
            height: 100.0,
            node_width: 10.0,
            nodes: vec![a, b],
            links: vec![link],
        }
    }

    #[test]
    fn midpoint_curve_between_edges() {
        let layout = two_node_layout();
        let path = curve_path(&layout, 0, DEFAULT_CURVATURE).unwrap();
        assert_eq!(path.start, (10.0, 20.0));
        assert_eq!(path.control1, (60.0, 20.0));
        assert_eq!(path.control2, (60.0, 60.0));
        assert_eq!(path.end, (110.0, 60.0));
        assert_eq!(path.to_svg_path(), "M10,20C60,20 60,60 110,60");
    }

    #[test]
    fn curvature_moves_control_points() {
        let layout = two_node_layout();
        let path = curve_path(&layout, 0, 0.25).unwrap();
        assert_eq!(path.control1.0, 35.0);
        assert_eq!(path.control2.0, 85.0);
        let flat = curve_path(&layout, 0, 0.0).unwrap();
        assert_eq!(flat.control1.0, flat.start.0);
        assert_eq!(flat.control2.0, flat.end.0);
    }

    #[test]
    fn missing_link_has_no_path() {
        let layout = two_node_layout();
        assert!(curve_path(&layout, 7, DEFAULT_CURVATURE).is_none());
    }
}
