// src/debug/svg.rs
use crate::math::{Point2D, types::Bounds2D};
use crate::territory::pipeline::CycleReport;
use std::io::Write;
use std::path::Path;
use tracing::info;

// ===================================================================================
// 1. HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Ein Helfer zum Erstellen einer SVG-Datei. Die y-Achse wird gespiegelt,
/// damit Norden oben liegt.
struct SvgBuilder {
    content: String,
    point_radius: f64,
}

impl SvgBuilder {
    /// Erstellt ein neues SVG-Grundgerüst mit Header, Stil und Hintergrund.
    fn new(display_bounds: &Bounds2D, svg_pixel_width: f64) -> Self {
        let viewbox_min_x = display_bounds.min.x;
        let viewbox_min_y = -display_bounds.max.y;
        let viewbox_width = display_bounds.width();
        let viewbox_height = display_bounds.height();
        let svg_pixel_height = svg_pixel_width * viewbox_height / viewbox_width;

        let stroke_w_normal = (viewbox_width + viewbox_height) / 2.0 * 0.002;
        let stroke_w_thin = (viewbox_width + viewbox_height) / 2.0 * 0.001;
        let point_radius = (viewbox_width + viewbox_height) / 2.0 * 0.003;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{svg_pixel_width}" height="{svg_pixel_height:.0}" viewBox="{viewbox_min_x} {viewbox_min_y} {viewbox_width} {viewbox_height}" xmlns="http://www.w3.org/2000/svg">
  <style>
    .background {{ fill: #f0f0f0; fill-opacity: 1.0; }}
    .clip-bounds {{ fill: none; stroke: #888888; stroke-width: {stroke_w_thin}; stroke-dasharray: 2,2; }}
    .territory {{ fill-opacity: 0.6; stroke: #333333; stroke-width: {stroke_w_normal}; }}
    .site {{ fill: #ffffff; stroke: #000000; stroke-width: {stroke_w_thin}; }}
  </style>
  <rect x="{viewbox_min_x}" y="{viewbox_min_y}" width="{viewbox_width}" height="{viewbox_height}" class="background" />
"#,
        );

        Self {
            content,
            point_radius,
        }
    }

    /// Zeichnet ein Polygon mit eigener Füllfarbe.
    fn draw_polygon(&mut self, vertices: &[Point2D], class: &str, fill: &str, title: &str) {
        if vertices.len() < 2 {
            return;
        }
        let points_str: String = vertices
            .iter()
            .map(|p| format!("{:.3},{:.3}", p.x, -p.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.content.push_str(&format!(
            r#"  <polygon points="{}" class="{}" fill="{}"><title>{}</title></polygon>
"#,
            points_str,
            class,
            fill,
            escape(title)
        ));
    }

    /// Zeichnet einen Kreis.
    fn draw_circle(&mut self, center: &Point2D, radius: f64, class: &str) {
        self.content.push_str(&format!(
            r#"  <circle cx="{:.3}" cy="{:.3}" r="{:.3}" class="{}" />
"#,
            center.x, -center.y, radius, class
        ));
    }

    /// Zeichnet ein Rechteck.
    fn draw_rect(&mut self, bounds: &Bounds2D, class: &str) {
        self.content.push_str(&format!(
            r#"  <rect x="{}" y="{}" width="{}" height="{}" class="{}" />
"#,
            bounds.min.x,
            -bounds.max.y,
            bounds.width(),
            bounds.height(),
            class
        ));
    }

    fn finish(mut self) -> String {
        self.content.push_str("</svg>\n");
        self.content
    }
}

/// Stabile Farbe je Besitzer (FNV-1a über den Namen -> Farbton).
fn owner_color(owner: &str) -> String {
    let hash = owner
        .bytes()
        .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
    format!("hsl({}, 65%, 55%)", hash % 360)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Rendert alle Territorien eines Zyklus als SVG-Text.
pub fn render_territory_svg(bounds: &Bounds2D, report: &CycleReport, svg_pixel_width: f64) -> String {
    let mut svg = SvgBuilder::new(bounds, svg_pixel_width);

    for cell in &report.cells {
        let title = format!(
            "{} (#{}) {:.0} mi²",
            cell.owner, cell.index, cell.measurement.area_sq_miles
        );
        svg.draw_polygon(
            cell.polygon.vertices(),
            "territory",
            &owner_color(&cell.owner),
            &title,
        );
    }
    svg.draw_rect(bounds, "clip-bounds");

    let radius = svg.point_radius;
    for cell in &report.cells {
        svg.draw_circle(&cell.site, radius, "site");
    }

    svg.finish()
}

/// Schreibt die Territorienkarte eines Zyklus nach `path`.
pub fn write_territory_svg(
    path: impl AsRef<Path>,
    bounds: &Bounds2D,
    report: &CycleReport,
    svg_pixel_width: f64,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let content = render_territory_svg(bounds, report, svg_pixel_width);
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    info!("Territory SVG '{}' written.", path.display());
    Ok(())
}
