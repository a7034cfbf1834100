//! POV-Ray scene export.
//!
//! Writes one `#declare`d `union` holding a `linear_sweep` prism built
//! from the un-rounded outline and one `bicubic_patch` per emitted patch.
//! The prism is rotated `90*x` into the patches' frame and the patches are
//! mirrored with `rotate 180*x`, so both end up extruding toward `+z`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use povround_kernel::{Patch, RoundedOutline, RoundingSettings};
use povround_math::{Point2, Point3};

use crate::{PovError, RoundedSolid};

const INDENT: &str = "    ";
const BODY_INDENT: &str = "        ";

/// Render the full scene text for `outline`.
pub fn render_scene(name: &str, outline: &RoundedOutline, settings: &RoundingSettings) -> String {
    let extra = settings.extra_code.as_deref();
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("#declare {} = union {{\n", name));
    out.push_str(&render_prism(&outline.prism_points(), settings.depth, extra));
    for patch in outline.patches() {
        out.push('\n');
        out.push_str(&render_patch(patch, extra));
    }
    out.push_str("\n}\n");
    out
}

/// Render the `prism` block, four points per line.
pub fn render_prism(points: &[Point2], depth: f64, extra: Option<&str>) -> String {
    let rows: Vec<String> = points
        .chunks(4)
        .map(|chunk| {
            let cells: Vec<String> = chunk
                .iter()
                .map(|p| format!("<{}, {}>", fmt_num(p.x), fmt_num(p.y)))
                .collect();
            format!("{}{}", BODY_INDENT, cells.join(", "))
        })
        .collect();

    let mut out = format!("{}prism {{\n", INDENT);
    out.push_str(&format!(
        "{}bezier_spline linear_sweep 0, {}, {}\n",
        BODY_INDENT,
        fmt_num(depth),
        points.len()
    ));
    if !rows.is_empty() {
        out.push_str(&rows.join(",\n"));
        out.push('\n');
    }
    out.push_str(&format!("{}rotate 90*x\n", BODY_INDENT));
    push_extra(&mut out, extra);
    out.push_str(INDENT);
    out.push('}');
    out
}

/// Render one labelled `bicubic_patch` block.
pub fn render_patch(patch: &Patch, extra: Option<&str>) -> String {
    let rows: Vec<String> = patch
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(fmt_point3).collect();
            format!("{}{}", BODY_INDENT, cells.join(", "))
        })
        .collect();

    let mut out = format!("{}// {}\n", INDENT, patch.label());
    out.push_str(&format!("{}bicubic_patch {{\n", INDENT));
    out.push_str(&format!("{}type 1 flatness 0.001\n", BODY_INDENT));
    out.push_str(&format!(
        "{}u_steps {} v_steps {}\n",
        BODY_INDENT, patch.smoothness, patch.smoothness
    ));
    out.push_str(&rows.join(",\n"));
    out.push('\n');
    out.push_str(&format!("{}rotate 180*x\n", BODY_INDENT));
    push_extra(&mut out, extra);
    out.push_str(INDENT);
    out.push('}');
    out
}

fn push_extra(out: &mut String, extra: Option<&str>) {
    if let Some(code) = extra.map(str::trim_end).filter(|c| !c.is_empty()) {
        out.push_str(&format!("{}{}\n", BODY_INDENT, code));
    }
}

fn fmt_point3(p: &Point3) -> String {
    format!("<{}, {}, {}>", fmt_num(p.x), fmt_num(p.y), fmt_num(p.z))
}

/// Format a coordinate with at most six decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let mut s = format!("{:.6}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Render `solid` and write it to `path`.
///
/// The scene is rendered completely before the file is created.
pub fn export_pov(solid: &RoundedSolid, path: impl AsRef<Path>) -> Result<(), PovError> {
    let text = solid.to_pov_string();
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    log::info!(
        "wrote {} patches for {} to {}",
        solid.outline.patch_count(),
        solid.name,
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use povround_kernel::{round_outline, PatchKind};
    use povround_outline::decode_polygon;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(6.0), "6");
        assert_eq!(fmt_num(-1.5), "-1.5");
        assert_eq!(fmt_num(0.76), "0.76");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
        assert_eq!(fmt_num(-0.0000001), "0");
        assert_eq!(fmt_num(10.760000000000002), "10.76");
        assert_eq!(fmt_num(100.0), "100");
    }

    #[test]
    fn test_render_prism_rows() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 1.5),
            Point2::new(3.0, 2.0),
            Point2::new(3.0, 2.5),
            Point2::new(3.0, 3.0),
        ];
        let text = render_prism(&points, 6.0, None);
        assert_eq!(
            text,
            "    prism {\n\
             \x20       bezier_spline linear_sweep 0, 6, 8\n\
             \x20       <0, 0>, <1, 0>, <2, 0>, <3, 0>,\n\
             \x20       <3, 1.5>, <3, 2>, <3, 2.5>, <3, 3>\n\
             \x20       rotate 90*x\n\
             \x20   }"
        );
    }

    #[test]
    fn test_render_patch_block() {
        let row = |z: f64| {
            [
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(2.0, 0.0, z),
                Point3::new(3.0, 0.0, z),
            ]
        };
        let patch = Patch {
            kind: PatchKind::Side,
            rows: [row(-1.0), row(-2.0), row(-3.0), row(-4.0)],
            smoothness: 4,
        };
        let text = render_patch(&patch, Some("texture { T }\n"));
        assert_eq!(
            text,
            "    // Side\n\
             \x20   bicubic_patch {\n\
             \x20       type 1 flatness 0.001\n\
             \x20       u_steps 4 v_steps 4\n\
             \x20       <0, 0, -1>, <1, 0, -1>, <2, 0, -1>, <3, 0, -1>,\n\
             \x20       <0, 0, -2>, <1, 0, -2>, <2, 0, -2>, <3, 0, -2>,\n\
             \x20       <0, 0, -3>, <1, 0, -3>, <2, 0, -3>, <3, 0, -3>,\n\
             \x20       <0, 0, -4>, <1, 0, -4>, <2, 0, -4>, <3, 0, -4>\n\
             \x20       rotate 180*x\n\
             \x20       texture { T }\n\
             \x20   }"
        );
    }

    #[test]
    fn test_render_scene_layout() {
        let points = decode_polygon("(0,0),(10,0),(10,10),(0,10)").unwrap();
        let settings = RoundingSettings {
            skip_front: true,
            skip_back: true,
            extra_code: Some("pigment { rgb 1 }".into()),
            ..Default::default()
        };
        let outline = round_outline(&points, &settings).unwrap();
        let text = render_scene("Box", &outline, &settings);

        assert!(text.starts_with("\n#declare Box = union {\n    prism {\n"));
        assert!(text.ends_with("    }\n}\n"));
        assert_eq!(text.matches("pigment { rgb 1 }").count(), 9);
        assert_eq!(text.matches("rotate 180*x").count(), 8);
        assert!(text.contains("        <0, 0>, <3.333333, 0>, <6.666667, 0>, <10, 0>,\n"));
    }
}
