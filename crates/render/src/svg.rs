//! SVG snapshot of a scene.

use mech_scene::{Camera, Primitive, Scene, Style, Viewport};

const PADDING: f64 = 30.0;

fn stroke_attrs(style: &Style) -> String {
    let mut attrs = format!(
        "stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"",
        style.color.to_hex(),
        style.width
    );
    if style.dashed {
        attrs.push_str(" stroke-dasharray=\"6,4\"");
    }
    attrs
}

/// Escape text content for an XML text node.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn scene_to_svg(scene: &Scene, camera: &Camera, width: f64, height: f64) -> String {
    let vp = Viewport::fit(&scene.bounds, camera, width, height, PADDING);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" style=\"background:#ffffff\">\n\
         <text x=\"{}\" y=\"20\" font-family=\"sans-serif\" font-size=\"15\" fill=\"#222222\" text-anchor=\"middle\">{}</text>\n",
        width / 2.0,
        escape(&scene.title)
    );

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Polyline { points, style } => {
                let coords: Vec<String> = points
                    .iter()
                    .map(|p| {
                        let (x, y) = vp.map(camera, p);
                        format!("{x:.1},{y:.1}")
                    })
                    .collect();
                svg.push_str(&format!(
                    "  <polyline points=\"{}\" {}/>\n",
                    coords.join(" "),
                    stroke_attrs(style)
                ));
            }
            Primitive::Marker { at, style } => {
                let (x, y) = vp.map(camera, at);
                svg.push_str(&format!(
                    "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"{}\" fill=\"{}\"/>\n",
                    style.width / 2.0,
                    style.color.to_hex()
                ));
            }
        }
    }

    // Legend, top left under the title.
    for (i, (label, style)) in scene.legend().into_iter().enumerate() {
        let y = 40.0 + 16.0 * i as f64;
        svg.push_str(&format!(
            "  <line x1=\"10\" y1=\"{y}\" x2=\"30\" y2=\"{y}\" {}/>\n  \
             <text x=\"36\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" fill=\"#222222\">{}</text>\n",
            stroke_attrs(style),
            y + 4.0,
            escape(label)
        ));
    }

    if !scene.caption.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"10\" fill=\"#5a6080\" text-anchor=\"middle\">{}</text>\n",
            width / 2.0,
            height - 8.0,
            escape(&scene.caption)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
