use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::render::commands::{Align, CommandStream, DrawCommand, FontFamily, StreamBuilder};
use crate::render::labels::emit_label;
use crate::render::limits::RenderLimits;
use crate::render::mode::{MapPlan, MapSettings, RenderMode};
use crate::render::RenderError;
use crate::Point3;

/// Page origin for A4 paper; maps are drawn landscape around it.
const PAGE_OFFSET: (f64, f64) = (298.0, 421.0);

const FLAT_LEFT: f64 = -130.0;
const FLAT_BOTTOM: f64 = -250.0;
const FLAT_SIZE: f64 = 500.0;
const FLAT_RIGHT: f64 = FLAT_LEFT + FLAT_SIZE;
const FLAT_TOP: f64 = FLAT_BOTTOM + FLAT_SIZE;

/// Horizontal and depth extents of the oblique 3D grid.
const TPSA: f64 = 369.4;
const TPSB: f64 = 130.6;

const COS5: f64 = 0.996194698092;
const SIN5: f64 = 0.087155742748;
const EYE: f64 = 10.0;
const STEREO_PANEL: f64 = 350.0;

const ORBIT_CANVAS_RADIUS: f64 = 250.0;

const ROWS_PER_COLUMN: usize = 34;
const COLUMNS_PER_PAGE: usize = 3;
const COLUMN_WIDTH: f64 = 250.0;
const ROW_HEIGHT: f64 = 15.0;

const SPECTRAL_KEY: &str = "OBAFGKM";
/// Raises key markers to the middle of the key letters.
const KEY_MARKER_RAISE: f64 = 3.0;

const LABEL_SIZE: f64 = 5.0;
const BODY_SIZE: f64 = 9.0;
const HAIRLINE: f64 = 0.001;
const DOTTED: [f64; 2] = [1.0, 2.0];

/// Whether a flat-map position falls off the drawing canvas.
pub fn out_of_bounds(psx: f64, psy: f64) -> bool {
    psx < FLAT_LEFT || psx > FLAT_RIGHT || psy < FLAT_BOTTOM || psy > FLAT_TOP
}

/// Marker radius for a spectral type; only the first letter counts.
pub fn marker_radius(spectral_type: &str) -> f64 {
    match spectral_type.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('O') => 3.5,
        Some('B') => 3.0,
        Some('A') => 2.5,
        Some('F') => 2.0,
        Some('G') => 1.5,
        Some('K') => 1.0,
        _ => 0.5,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlottedStar {
    pub position: Point3,
    pub name: String,
    pub spectral_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitingBody {
    pub name: String,
    /// Millions of km.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
}

impl OrbitingBody {
    pub fn periapsis(&self) -> f64 {
        (1.0 - self.eccentricity) * self.semi_major_axis
    }

    pub fn apoapsis(&self) -> f64 {
        (1.0 + self.eccentricity) * self.semi_major_axis
    }
}

/// Turns a star list into a drawing-command stream for one resolved mode.
#[derive(Clone, Debug)]
pub struct MapRenderer {
    plan: MapPlan,
    stars: Vec<PlottedStar>,
    orbits: BTreeMap<usize, Vec<OrbitingBody>>,
}

impl MapRenderer {
    /// Plots every system of `catalog`, labelled by position. Stars are kept
    /// furthest-first so nearer markers are drawn over farther ones.
    pub fn new(catalog: &Catalog, settings: &MapSettings) -> Result<Self, RenderError> {
        let stars = catalog
            .painter_order()
            .into_iter()
            .map(|s| PlottedStar {
                position: s.position,
                name: s.position.to_string(),
                spectral_type: s.color.spectral_code().to_string(),
            })
            .collect();
        Self::from_stars(stars, settings)
    }

    pub fn from_stars(stars: Vec<PlottedStar>, settings: &MapSettings) -> Result<Self, RenderError> {
        let plan = settings.resolve()?;
        if stars.is_empty() {
            return Err(RenderError::EmptyCatalog);
        }
        Ok(MapRenderer {
            plan,
            stars,
            orbits: BTreeMap::new(),
        })
    }

    pub fn mode(&self) -> RenderMode {
        self.plan.mode
    }

    pub fn stars(&self) -> &[PlottedStar] {
        &self.stars
    }

    /// Attaches orbiting bodies to the star at `index` of [`MapRenderer::stars`]
    /// for orbit plots.
    pub fn attach_orbits(
        &mut self,
        index: usize,
        bodies: Vec<OrbitingBody>,
    ) -> Result<(), RenderError> {
        if index >= self.stars.len() {
            return Err(RenderError::InvalidParameter(format!(
                "no star at index {index}"
            )));
        }
        for body in &bodies {
            if !(body.semi_major_axis > 0.0) || !(0.0..1.0).contains(&body.eccentricity) {
                return Err(RenderError::InvalidParameter(format!(
                    "orbit of {} is not an ellipse",
                    body.name
                )));
            }
        }
        self.orbits.insert(index, bodies);
        Ok(())
    }

    pub fn limits(&self) -> Result<RenderLimits, RenderError> {
        let points: Vec<Point3> = self.stars.iter().map(|s| s.position).collect();
        RenderLimits::compute(&self.plan, &points)
    }

    pub fn render(&self) -> Result<CommandStream, RenderError> {
        let limits = self.limits()?;
        info!(
            "render: {:?}, {} stars, grid {} over width {}",
            self.plan.mode,
            self.stars.len(),
            limits.grid_size,
            limits.map_width
        );
        let mut out = StreamBuilder::new();
        header(&mut out);
        match self.plan.mode {
            RenderMode::Flat { .. } => {
                spectral_key(&mut out);
                self.flat_grid(&mut out, &limits);
                self.flat_stars(&mut out, &limits);
                if self.plan.display.data_pages {
                    self.data_pages(&mut out);
                }
            }
            RenderMode::ThreeD { .. } => {
                spectral_key(&mut out);
                self.grid_3d(&mut out, &limits);
                self.stars_3d(&mut out, &limits);
                if self.plan.display.data_pages {
                    self.data_pages(&mut out);
                }
            }
            RenderMode::Stereo => self.stereo_pair(&mut out, &limits),
            RenderMode::Orbit => self.orbit_plots(&mut out),
        }
        Ok(out.finish())
    }

    fn flat_grid(&self, out: &mut StreamBuilder, lim: &RenderLimits) {
        let grid = lim.grid_size as f64;
        let width = lim.map_width as f64;
        let [hmin, vmin, _] = lim.plot_min.map(|v| v as f64);
        let xbegin = grid * (hmin / grid).ceil();
        let ybegin = grid * (vmin / grid).ceil();
        let psgrid = FLAT_SIZE / (width / grid);
        let psxbegin = (xbegin - hmin) * psgrid / grid + FLAT_LEFT;
        let psybegin = (ybegin - vmin) * psgrid / grid + FLAT_BOTTOM;
        let lines = self.plan.display.grid_lines;

        for (k, x) in steps(psxbegin, psgrid, FLAT_RIGHT).enumerate() {
            out.move_to(x, FLAT_BOTTOM);
            out.push(DrawCommand::Save);
            if lines {
                out.line_style(&DOTTED, HAIRLINE);
                out.line_to(0.0, FLAT_SIZE);
                out.push(DrawCommand::Stroke);
            } else {
                out.line_style(&[], HAIRLINE);
                out.line_to(0.0, 5.0);
                out.push(DrawCommand::Stroke);
                out.move_to(x, FLAT_TOP);
                out.line_to(0.0, -5.0);
                out.push(DrawCommand::Stroke);
            }
            out.push(DrawCommand::Restore);
            out.move_to(x, FLAT_BOTTOM - 10.0);
            out.text(grid_label(xbegin, lim.grid_size, k), Align::Centre);
        }
        for (k, y) in steps(psybegin, psgrid, FLAT_TOP).enumerate() {
            out.move_to(FLAT_LEFT, y);
            out.push(DrawCommand::Save);
            if lines {
                out.line_style(&DOTTED, HAIRLINE);
                out.line_to(FLAT_SIZE, 0.0);
                out.push(DrawCommand::Stroke);
            } else {
                out.line_style(&[], HAIRLINE);
                out.line_to(5.0, 0.0);
                out.push(DrawCommand::Stroke);
                out.move_to(FLAT_RIGHT, y);
                out.line_to(-5.0, 0.0);
                out.push(DrawCommand::Stroke);
            }
            out.push(DrawCommand::Restore);
            out.move_to(FLAT_LEFT - 5.0, y);
            out.text(grid_label(ybegin, lim.grid_size, k), Align::Right);
        }

        out.push(DrawCommand::Save);
        out.line_style(&[], 0.48);
        out.move_to(FLAT_LEFT, FLAT_BOTTOM);
        out.line_to(0.0, FLAT_SIZE);
        out.line_to(FLAT_SIZE, 0.0);
        out.line_to(0.0, -FLAT_SIZE);
        out.push(DrawCommand::ClosePath);
        out.push(DrawCommand::Stroke);
        out.push(DrawCommand::Restore);

        let [h, v, _] = self.plan.mode.depth_axis().display_labels();
        out.font(FontFamily::Bold, BODY_SIZE);
        out.move_to(120.0, -270.0);
        out.text(h.to_string(), Align::Centre);
        out.move_to(-150.0, 0.0);
        out.text(v.to_string(), Align::Right);
        out.font(FontFamily::Roman, BODY_SIZE);
    }

    fn flat_stars(&self, out: &mut StreamBuilder, lim: &RenderLimits) {
        let axis = self.plan.mode.depth_axis();
        let width = lim.map_width as f64;
        let display = &self.plan.display;
        let mut skipped = 0usize;
        for star in &self.stars {
            let [h, v, d] = axis.display(&star.position);
            let psx = FLAT_LEFT + FLAT_SIZE * ((h - lim.plot_min[0] as f64) / width);
            let psy = FLAT_BOTTOM + FLAT_SIZE * ((v - lim.plot_min[1] as f64) / width);
            if out_of_bounds(psx, psy) {
                skipped += 1;
                continue;
            }
            if display.show_name {
                emit_label(out, &star.name, LABEL_SIZE, psx, psy + 6.0);
            }
            if display.show_spectral_type {
                emit_label(out, &star.spectral_type, LABEL_SIZE, psx + 7.0, psy - 1.0);
            }
            if display.show_collapsed_coordinate {
                emit_label(out, &format!("{d:.2}"), LABEL_SIZE, psx + 7.0, psy - 8.0);
            }
            out.blob(psx, psy, marker_radius(&star.spectral_type));
        }
        if skipped > 0 {
            debug!("render: {skipped} stars fall outside the map");
        }
    }

    fn grid_3d(&self, out: &mut StreamBuilder, lim: &RenderLimits) {
        let grid = lim.grid_size as f64;
        let width = lim.map_width as f64;
        let [hmin, vmin, dmin] = lim.plot_min.map(|v| v as f64);
        let xbegin = grid * (hmin / grid).ceil();
        let ybegin = grid * (vmin / grid).ceil();
        let numgrids = width / grid;
        let psplane = (lim.plane_height as f64 - dmin) * TPSA / width + FLAT_BOTTOM;
        let xgrid = TPSA / numgrids;
        let ygrid = TPSB / numgrids;
        let psxbegin = (xbegin - hmin) * xgrid / grid + FLAT_LEFT;
        let psybegin = (ybegin - vmin) * ygrid / grid + psplane;
        let lines = self.plan.display.grid_lines;

        out.font(FontFamily::Roman, LABEL_SIZE);
        for (k, x) in steps(psxbegin, xgrid, TPSA + FLAT_LEFT).enumerate() {
            out.move_to(x, psplane);
            out.push(DrawCommand::Save);
            if lines {
                out.line_style(&DOTTED, HAIRLINE);
                out.line_to(TPSB, TPSB);
                out.push(DrawCommand::Stroke);
            } else {
                out.line_style(&[], HAIRLINE);
                out.line_to(3.0, 3.0);
                out.push(DrawCommand::Stroke);
                out.move_to(x + TPSB, psplane + TPSB);
                out.line_to(-3.0, -3.0);
                out.push(DrawCommand::Stroke);
            }
            out.push(DrawCommand::Restore);
            out.move_to(x, psplane - 6.0);
            out.text(grid_label(xbegin, lim.grid_size, k), Align::Centre);
        }
        for (k, y) in steps(psybegin, ygrid, psplane + TPSB).enumerate() {
            // Rows shift right as they recede.
            let sx = FLAT_LEFT + (y - psplane);
            out.move_to(sx, y);
            out.push(DrawCommand::Save);
            if lines {
                out.line_style(&DOTTED, HAIRLINE);
                out.line_to(TPSA, 0.0);
                out.push(DrawCommand::Stroke);
            } else {
                out.line_style(&[], HAIRLINE);
                out.line_to(5.0, 0.0);
                out.push(DrawCommand::Stroke);
                out.move_to(sx + TPSA, y);
                out.line_to(-5.0, 0.0);
                out.push(DrawCommand::Stroke);
            }
            out.push(DrawCommand::Restore);
            out.move_to(sx - 5.0, y);
            out.text(grid_label(ybegin, lim.grid_size, k), Align::Right);
        }

        out.push(DrawCommand::Save);
        out.line_style(&[], 0.48);
        out.move_to(FLAT_LEFT, psplane);
        out.line_to(TPSA, 0.0);
        out.line_to(TPSB, TPSB);
        out.line_to(-TPSA, 0.0);
        out.push(DrawCommand::ClosePath);
        out.push(DrawCommand::Stroke);
        out.push(DrawCommand::Restore);

        let [h, v, d] = self.plan.mode.depth_axis().display_labels();
        out.font(FontFamily::Bold, BODY_SIZE);
        out.move_to(TPSA / 2.0 + FLAT_LEFT, psplane - 15.0);
        out.text(h.to_string(), Align::Centre);
        out.move_to(-80.0, psplane + TPSB / 2.0);
        out.text(v.to_string(), Align::Right);
        out.move_to(-345.0, -100.0);
        out.text(
            format!("Reference plane at {d} = {}", lim.plane_height),
            Align::Left,
        );
        out.font(FontFamily::Roman, BODY_SIZE);
    }

    fn stars_3d(&self, out: &mut StreamBuilder, lim: &RenderLimits) {
        let axis = self.plan.mode.depth_axis();
        let width = lim.map_width as f64;
        let [hmin, vmin, dmin] = lim.plot_min.map(|v| v as f64);
        let [hmax, vmax, _] = lim.plot_max.map(|v| v as f64);
        let display = &self.plan.display;
        for star in &self.stars {
            let [h, v, d] = axis.display(&star.position);
            let xoff = TPSA * ((h - hmin) / width);
            let yoff = TPSB * ((v - vmin) / width);
            let zoff = TPSA * ((d - dmin) / width);
            let poff = TPSA * ((d - lim.plane_height as f64) / width);
            let psx = FLAT_LEFT + xoff + yoff;
            let psy = FLAT_BOTTOM + zoff + yoff;

            if out_of_bounds(psx, psy) || h < hmin || h > hmax || v < vmin || v > vmax {
                continue;
            }

            out.blob(psx, psy, marker_radius(&star.spectral_type));
            out.push(DrawCommand::Save);
            out.line_style(&[], HAIRLINE);
            out.move_to(psx, psy);
            out.line_to(0.0, -poff);
            out.push(DrawCommand::Stroke);
            if display.vertical_reference {
                out.move_to(psx, psy);
                out.line_to(-xoff, 0.0);
                out.push(DrawCommand::Stroke);
            }
            if display.show_name {
                emit_label(out, &star.name, LABEL_SIZE, psx, psy + 6.0);
            }
            out.push(DrawCommand::Restore);
        }
    }

    fn stereo_pair(&self, out: &mut StreamBuilder, lim: &RenderLimits) {
        out.move_to(0.0, 100.0);
        out.line_to(0.0, -STEREO_PANEL);
        out.line_to(STEREO_PANEL, 0.0);
        out.line_to(0.0, STEREO_PANEL);
        out.line_to(-2.0 * STEREO_PANEL, 0.0);
        out.line_to(0.0, -STEREO_PANEL);
        out.line_to(STEREO_PANEL, 0.0);
        out.push(DrawCommand::Stroke);
        out.move_to(-350.0, 250.0);
        out.text("Perspective plot", Align::Left);

        let [cx, cy, cz] = lim.raw_centre();
        let centre = Point3::new(-cx, -cy, -cz);
        let centred: Vec<Point3> = self
            .stars
            .iter()
            .map(|s| s.position.translate(&centre))
            .collect();
        let max_dist = centred
            .iter()
            .map(Point3::distance_from_origin)
            .fold(0.0, f64::max);
        let left: Vec<Point3> = if max_dist > 0.0 {
            centred.iter().map(|p| p.scale(1.0 / max_dist)).collect()
        } else {
            centred
        };
        let right: Vec<Point3> = left.iter().map(rotate_5).collect();

        for (l, r) in left.iter().zip(&right) {
            stereo_point(out, l, 0.0);
            stereo_point(out, r, 1.0);
        }
    }

    fn orbit_plots(&self, out: &mut StreamBuilder) {
        let mut first = true;
        for (&index, bodies) in &self.orbits {
            if bodies.is_empty() {
                continue;
            }
            if !first {
                out.push(DrawCommand::PageBreak);
                header(out);
            }
            first = false;

            let star = &self.stars[index];
            emit_label(out, &star.name, BODY_SIZE, -345.0, 220.0);

            let perimax = bodies.iter().map(OrbitingBody::periapsis).fold(0.0, f64::max);
            let apomax = bodies.iter().map(OrbitingBody::apoapsis).fold(0.0, f64::max);
            let mid = (apomax + perimax) / 2.0;
            let scale = ORBIT_CANVAS_RADIUS / mid;
            let focus = scale * (apomax - mid);

            out.line_style(&[], 0.0);
            out.blob(focus, 0.0, marker_radius(&star.spectral_type));
            for body in bodies {
                let rx = body.semi_major_axis * scale;
                let ry = rx * (1.0 - body.eccentricity * body.eccentricity).sqrt();
                out.push(DrawCommand::Ellipse {
                    cx: focus - scale * body.eccentricity * body.semi_major_axis,
                    cy: 0.0,
                    rx,
                    ry,
                });
                out.push(DrawCommand::Stroke);
            }
        }
    }

    fn data_pages(&self, out: &mut StreamBuilder) {
        let per_page = ROWS_PER_COLUMN * COLUMNS_PER_PAGE;
        for (i, star) in self.stars.iter().enumerate() {
            if i % per_page == 0 {
                out.push(DrawCommand::PageBreak);
                header(out);
                out.move_to(350.0, 260.0);
                out.font(FontFamily::Bold, BODY_SIZE);
                out.text(format!("Page {}", i / per_page + 1), Align::Left);
                out.font(FontFamily::Roman, BODY_SIZE);
            }
            let column = (i / ROWS_PER_COLUMN) % COLUMNS_PER_PAGE;
            let row = i % ROWS_PER_COLUMN;
            let y = 250.0 - ROW_HEIGHT * row as f64;
            let cpos = column as f64 * COLUMN_WIDTH;
            let p = star.position;
            out.move_to(-375.0 + cpos, y);
            out.text(format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z), Align::Left);
            emit_label(out, &star.name, BODY_SIZE, -275.0 + cpos, y);
            out.move_to(-200.0 + cpos, y);
            out.text(star.spectral_type.clone(), Align::Left);
        }
    }
}

fn header(out: &mut StreamBuilder) {
    out.font(FontFamily::Roman, BODY_SIZE);
    out.push(DrawCommand::Translate {
        dx: PAGE_OFFSET.0,
        dy: PAGE_OFFSET.1,
    });
    out.push(DrawCommand::Rotate { degrees: 90.0 });
}

fn spectral_key(out: &mut StreamBuilder) {
    let outline = |out: &mut StreamBuilder, x: f64, y: f64| {
        out.move_to(x, y);
        out.line_to(120.0, 0.0);
        out.line_to(0.0, -190.0);
        out.line_to(-120.0, 0.0);
        out.push(DrawCommand::ClosePath);
    };
    outline(out, -345.0, 220.0);
    out.push(DrawCommand::Fill);
    out.push(DrawCommand::Save);
    out.push(DrawCommand::SetGray { level: 1.0 });
    outline(out, -350.0, 225.0);
    out.push(DrawCommand::Fill);
    out.push(DrawCommand::Restore);
    outline(out, -350.0, 225.0);
    out.push(DrawCommand::Stroke);

    out.move_to(-325.0, 200.0);
    out.font(FontFamily::Bold, BODY_SIZE);
    out.text("Spectral Type Key", Align::Left);
    out.font(FontFamily::Roman, BODY_SIZE);
    for (i, letter) in SPECTRAL_KEY.chars().enumerate() {
        let y = 180.0 - 20.0 * i as f64;
        let code = letter.to_string();
        out.blob(-310.0, y + KEY_MARKER_RAISE, marker_radius(&code));
        out.move_to(-290.0, y);
        out.text(code, Align::Left);
    }
}

/// Positions from `start` in `step` increments up to and including `end`.
fn steps(start: f64, step: f64, end: f64) -> impl Iterator<Item = f64> {
    (0..)
        .map(move |k| start + step * k as f64)
        .take_while(move |&v| step > 0.0 && v <= end + 1e-9)
}

fn grid_label(begin: f64, grid: i64, k: usize) -> String {
    (begin as i64 + grid * k as i64).to_string()
}

fn rotate_5(p: &Point3) -> Point3 {
    Point3::new(COS5 * p.x - SIN5 * p.y, SIN5 * p.x + COS5 * p.y, p.z)
}

fn stereo_point(out: &mut StreamBuilder, p: &Point3, side: f64) {
    let perspy = p.y * EYE / (EYE - p.x);
    let perspz = p.z * EYE / (EYE - p.x);
    let psx = -175.0 + side * STEREO_PANEL + perspy * 150.0;
    let psy = perspz * 150.0 - 75.0;
    out.blob(psx, psy, 2.0 + p.x);
}
