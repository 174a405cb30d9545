use crate::render::mode::MapPlan;
use crate::render::RenderError;
use crate::Point3;

/// Grid cells a map is divided into before the spacing is rounded.
const TARGET_GRID_CELLS: f64 = 20.0;

/// Bounding box and grid of one rendered map. All per-axis arrays are in
/// display order (horizontal, vertical, depth).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderLimits {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub plot_min: [i64; 3],
    pub plot_max: [i64; 3],
    pub map_width: i64,
    pub plane_height: i64,
    pub grid_size: i64,
}

/// Rounds `map_size / 20` up to 1, 2, 5 or 10 times a power of ten.
pub fn grid_size(map_size: f64) -> i64 {
    let mut size = map_size / TARGET_GRID_CELLS;
    let mut reduction = 1i64;
    while size >= 10.0 {
        size /= 10.0;
        reduction *= 10;
    }
    let snapped = if size <= 1.0 {
        1
    } else if size <= 2.0 {
        2
    } else if size <= 5.0 {
        5
    } else {
        10
    };
    snapped * reduction
}

/// Grows `[min, max]` to span `target`, splitting the growth evenly. An odd
/// number of grid units puts the extra unit on the max side.
fn widen(min: &mut i64, max: &mut i64, target: i64, grid: i64) {
    let mut extra = target - (*max - *min);
    if extra <= 0 {
        return;
    }
    if (extra / grid) % 2 != 0 {
        *max += grid;
        extra -= grid;
    }
    *min -= extra / 2;
    *max += extra / 2;
}

impl RenderLimits {
    pub fn compute(plan: &MapPlan, points: &[Point3]) -> Result<Self, RenderError> {
        let axis = plan.mode.depth_axis();
        let mut display = points.iter().map(|p| axis.display(p));
        let first = display.next().ok_or(RenderError::EmptyCatalog)?;
        let (mut min, mut max) = (first, first);
        for d in display {
            for i in 0..3 {
                min[i] = min[i].min(d[i]);
                max[i] = max[i].max(d[i]);
            }
        }

        let three_d = plan.mode.is_three_d();
        let map_size = match plan.window {
            Some(window) => window.width as f64,
            None if three_d => (0..3).map(|i| max[i] - min[i]).fold(0.0, f64::max),
            None => (max[0] - min[0]).max(max[1] - min[1]),
        };
        let grid = grid_size(map_size);

        let (plot_min, plot_max, map_width) = match plan.window {
            Some(window) => {
                let plot_max = window.min.map(|m| m + window.width);
                (window.min, plot_max, window.width)
            }
            None => {
                let g = grid as f64;
                let mut plot_min = [0i64; 3];
                let mut plot_max = [0i64; 3];
                for i in 0..3 {
                    plot_min[i] = (g * (min[i] / g).floor()) as i64;
                    plot_max[i] = (g * (max[i] / g).ceil()) as i64;
                    if plot_max[i] == plot_min[i] {
                        plot_max[i] += grid;
                    }
                }
                let axes = if three_d { 3 } else { 2 };
                let target = (0..axes)
                    .map(|i| plot_max[i] - plot_min[i])
                    .max()
                    .unwrap_or(grid);
                for i in 0..axes {
                    widen(&mut plot_min[i], &mut plot_max[i], target, grid);
                }
                (plot_min, plot_max, target)
            }
        };

        let plane_height = plan.plane_height.unwrap_or(
            if plot_min[2] <= 0 && plot_max[2] >= 0 {
                0
            } else {
                plot_min[2]
            },
        );

        Ok(RenderLimits {
            min,
            max,
            plot_min,
            plot_max,
            map_width,
            plane_height,
            grid_size: grid,
        })
    }

    /// Midpoint of the raw extents, in display order.
    pub fn raw_centre(&self) -> [f64; 3] {
        [0, 1, 2].map(|i| (self.min[i] + self.max[i]) / 2.0)
    }
}
