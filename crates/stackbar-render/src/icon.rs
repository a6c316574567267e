use crate::model::{AxisTick, BarIconLayout, BarRect, IconFrame, IconOptions};
use crate::stack::{primary_totals, sorted_desc_totals, sorted_secondary_categories, stack_segments};
use stackbar_core::{BarData, DEFAULT_RULE_COLOR};

const BAND_PADDING: f64 = 0.1;

impl IconFrame {
    pub fn new(zoom: f64, chart_size: u32, show_axis_labels: bool) -> Self {
        let chart_size = f64::from(chart_size);
        let bars_size = zoom * (10.0 + chart_size);

        let (upper_text_reserve, x_path_width, y_path_width, tick_size, font_size) =
            if show_axis_labels {
                (10.0, 2.0, 2.0, 6.0, (chart_size + 2.0).min(20.0))
            } else {
                (0.0, 1.0, 0.0, 0.0, 0.0)
            };
        let (x_axis_legend_height, y_axis_legend_width) = if show_axis_labels {
            (200.0, 200.0)
        } else {
            (0.0, 0.0)
        };

        Self {
            bars_size,
            upper_text_reserve,
            x_axis_legend_height,
            y_axis_legend_width,
            x_path_width,
            y_path_width,
            tick_size,
            font_size,
            width: y_axis_legend_width + bars_size,
            height: upper_text_reserve + x_axis_legend_height + bars_size,
            anchor_x: y_axis_legend_width + bars_size / 2.0,
            anchor_y: upper_text_reserve + bars_size / 2.0,
        }
    }
}

/// An ordinal band scale over `[0, range]` with equal inner/outer padding, centered.
#[derive(Debug, Clone, Copy)]
struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    fn new(count: usize, range: f64, padding: f64) -> Self {
        let n = count as f64;
        let step = range / f64::max(1.0, n - padding + padding * 2.0);
        let start = (range - step * (n - padding)) * 0.5;
        Self {
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }
}

/// Maps `[0, max]` onto `[range, 0]`; a non-positive `max` flattens everything to the baseline.
#[derive(Debug, Clone, Copy)]
struct LinearScale {
    max: f64,
    range: f64,
}

impl LinearScale {
    fn y(&self, value: f64) -> f64 {
        if self.max > 0.0 {
            self.range - value / self.max * self.range
        } else {
            self.range
        }
    }
}

/// Lays out the stacked bar icon of one marker or cluster at `zoom`.
pub fn layout_bar_icon(data: &BarData, options: &IconOptions, zoom: f64) -> BarIconLayout {
    let frame = IconFrame::new(zoom, options.chart_size, options.show_axis_labels);

    let totals = primary_totals(&data.values);
    let max_primary_total = totals.values().copied().fold(0.0, f64::max);
    let primaries = sorted_desc_totals(&totals);
    let secondaries = sorted_secondary_categories(&data.values);
    let segments = stack_segments(&data.values, &primaries, &secondaries);

    let x_scale = BandScale::new(primaries.len(), frame.bars_size, BAND_PADDING);
    let y_scale = LinearScale {
        max: max_primary_total,
        range: frame.bars_size,
    };

    let bars = segments
        .iter()
        .map(|segment| {
            let index = primaries
                .iter()
                .position(|p| *p == segment.primary_category)
                .unwrap_or(0);
            let fill = data
                .cell_color(&segment.primary_category, &segment.secondary_category)
                .or(options.chart_color.as_deref())
                .unwrap_or(DEFAULT_RULE_COLOR);
            let y_top = y_scale.y(segment.y_end);
            BarRect {
                primary_category: segment.primary_category.clone(),
                secondary_category: segment.secondary_category.clone(),
                x: x_scale.position(index),
                y: y_top,
                width: x_scale.bandwidth,
                height: y_scale.y(segment.y_start) - y_top,
                fill: fill.to_string(),
            }
        })
        .collect();

    let x_ticks = primaries
        .iter()
        .enumerate()
        .map(|(i, p)| AxisTick {
            label: p.to_string(),
            position: x_scale.position(i) + x_scale.bandwidth / 2.0,
        })
        .collect();

    BarIconLayout {
        frame,
        primary_categories: primaries.iter().map(|p| p.to_string()).collect(),
        secondary_categories: secondaries.iter().map(|s| s.to_string()).collect(),
        max_primary_total,
        segments,
        bars,
        x_ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackbar_core::AggregationFunction;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn options(show_axis_labels: bool) -> IconOptions {
        IconOptions {
            is_group: false,
            chart_size: 10,
            chart_color: Some("#E32400".to_string()),
            show_axis_labels,
        }
    }

    #[test]
    fn frame_without_labels_is_just_the_plot() {
        let frame = IconFrame::new(3.0, 10, false);
        assert_eq!(frame.bars_size, 60.0);
        assert_eq!((frame.width, frame.height), (60.0, 60.0));
        assert_eq!((frame.anchor_x, frame.anchor_y), (30.0, 30.0));
        assert_eq!(frame.x_path_width, 1.0);
        assert_eq!(frame.font_size, 0.0);
    }

    #[test]
    fn frame_with_labels_reserves_legend_space() {
        let frame = IconFrame::new(2.0, 30, true);
        assert_eq!(frame.bars_size, 80.0);
        assert_eq!(frame.width, 280.0);
        assert_eq!(frame.height, 290.0);
        assert_eq!((frame.anchor_x, frame.anchor_y), (240.0, 50.0));
        assert_eq!(frame.font_size, 20.0);
        assert_eq!(frame.tick_size, 6.0);
    }

    #[test]
    fn bars_stack_from_the_baseline_and_use_rule_colors() {
        let mut data = BarData::default();
        data.record("A", "x", 5.0, AggregationFunction::Sum);
        data.record("A", "y", 25.0, AggregationFunction::Sum);
        data.record("B", "x", 60.0, AggregationFunction::Sum);
        data.category_colors.insert("y".into(), "green".into());

        let layout = layout_bar_icon(&data, &options(false), 3.0);
        assert_eq!(layout.primary_categories, vec!["B", "A"]);
        assert_eq!(layout.max_primary_total, 60.0);

        let bars_size = layout.frame.bars_size;
        let b = &layout.bars[0];
        assert_eq!(b.primary_category, "B");
        assert!(close(b.y, 0.0));
        assert!(close(b.height, bars_size));
        assert_eq!(b.fill, "#E32400");

        let a_y = layout
            .bars
            .iter()
            .find(|r| r.primary_category == "A" && r.secondary_category == "y")
            .unwrap();
        assert_eq!(a_y.fill, "green");
        assert!(close(a_y.height, bars_size * 25.0 / 60.0));
        assert!(layout.bars.iter().all(|r| close(r.width, layout.bars[0].width)));
        assert!(layout.bars[0].x < a_y.x);
    }

    #[test]
    fn band_scale_matches_padded_layout() {
        let scale = BandScale::new(2, 100.0, 0.1);
        // step = 100 / 2.1
        assert!(close(scale.step, 100.0 / 2.1));
        assert!(close(scale.bandwidth, scale.step * 0.9));
        assert!(close(scale.position(0), scale.step * 0.1));
        assert!(close(scale.position(1) + scale.bandwidth + scale.step * 0.1, 100.0));
    }

    #[test]
    fn empty_data_lays_out_an_empty_chart() {
        let layout = layout_bar_icon(&BarData::default(), &options(true), 5.0);
        assert!(layout.bars.is_empty());
        assert!(layout.segments.is_empty());
        assert_eq!(layout.max_primary_total, 0.0);
    }
}
