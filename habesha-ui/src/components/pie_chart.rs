//! Ratings Pie Chart
//!
//! Guest star-rating distribution drawn on an HTML5 canvas.

use habesha_core::analytics::{
    RatingDistribution, NO_RATINGS_MESSAGE, RATING_LABELS, SLICE_BORDERS, SLICE_COLORS,
};
use leptos::*;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Pie chart of guest ratings, or a message when nobody rated
#[component]
pub fn RatingsPieChart(
    #[prop(into)]
    distribution: Signal<RatingDistribution>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw when the data changes or the canvas (re)mounts
    create_effect(move |_| {
        let dist = distribution.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_pie(&canvas, &dist);
        }
    });

    view! {
        <Show
            when=move || !distribution.with(|d| d.is_empty())
            fallback=|| view! {
                <p class="text-center text-gray-500 py-10">{NO_RATINGS_MESSAGE}</p>
            }
        >
            <div class="flex flex-col items-center">
                <canvas
                    node_ref=canvas_ref
                    width="300"
                    height="300"
                    class="w-64 h-64"
                />
                <ul class="mt-4 space-y-1 text-sm">
                    {move || {
                        let dist = distribution.get();
                        (0..RATING_LABELS.len()).map(|i| view! {
                            <li class="flex items-center space-x-2" title=dist.slice_label(i)>
                                <span
                                    class="w-3 h-3 rounded-full inline-block"
                                    style=format!(
                                        "background-color: {}; border: 1px solid {}",
                                        SLICE_COLORS[i], SLICE_BORDERS[i]
                                    )
                                />
                                <span class="text-gray-700">{RATING_LABELS[i]}</span>
                                <span class="text-gray-500">{dist.slice_label(i)}</span>
                            </li>
                        }).collect_view()
                    }}
                </ul>
            </div>
        </Show>
    }
}

/// Start and end angle of each non-empty slice, clockwise from 12 o'clock
fn slice_angles(dist: &RatingDistribution) -> Vec<(usize, f64, f64)> {
    let total = dist.total();
    if total == 0 {
        return Vec::new();
    }

    let mut start = -PI / 2.0;
    let mut slices = Vec::new();
    for (i, &count) in dist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let sweep = f64::from(count) / f64::from(total) * 2.0 * PI;
        slices.push((i, start, start + sweep));
        start += sweep;
    }
    slices
}

fn draw_pie(canvas: &HtmlCanvasElement, dist: &RatingDistribution) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = cx.min(cy) - 4.0;

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_line_width(1.0);

    for (i, start, end) in slice_angles(dist) {
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();

        ctx.set_fill_style(&SLICE_COLORS[i].into());
        ctx.fill();
        ctx.set_stroke_style(&SLICE_BORDERS[i].into());
        ctx.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_cover_full_circle() {
        let dist = RatingDistribution {
            counts: [1, 0, 1, 0, 2],
        };
        let slices = slice_angles(&dist);

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].0, 0);
        assert!((slices[0].1 + PI / 2.0).abs() < 1e-9);
        assert!((slices[2].2 - slices[0].1 - 2.0 * PI).abs() < 1e-9);
        // 5-star slice is half the pie
        assert!((slices[2].2 - slices[2].1 - PI).abs() < 1e-9);
    }

    #[test]
    fn test_empty_distribution_has_no_slices() {
        assert!(slice_angles(&RatingDistribution::default()).is_empty());
    }
}
