use crate::domain::chart::{ChartModel, PlotArea, build_chart_model};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::KlineSeries;
use crate::{log_debug, log_warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use super::ChartAdapter;

const BACKGROUND: &str = "#1a1a2e";
const MA_LINE_WIDTH: f64 = 1.5;
const DEFAULT_HEIGHT: u32 = 400;

/// Chart adapter over a 2D canvas. `bind` owns exactly one canvas inside the
/// container; rebinding tears the previous one down first. The rendering
/// backend behind the `ChartAdapter` trait is interchangeable; this is the
/// canvas implementation.
#[derive(Default)]
pub struct CanvasChart {
    container: Option<Element>,
    canvas: Option<HtmlCanvasElement>,
    legend: Option<Element>,
    /// Kept so a container resize can redraw the current series
    last_series: Option<KlineSeries>,
}

impl CanvasChart {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Option<CanvasRenderingContext2d> {
        let canvas = self.canvas.as_ref()?;
        canvas.get_context("2d").ok()??.dyn_into::<CanvasRenderingContext2d>().ok()
    }

    fn plot_area(&self) -> Option<PlotArea> {
        let canvas = self.canvas.as_ref()?;
        Some(PlotArea::new(canvas.width() as f64, canvas.height() as f64))
    }

    fn paint_background(&self, ctx: &CanvasRenderingContext2d, area: PlotArea) {
        ctx.clear_rect(0.0, 0.0, area.width, area.height);
        ctx.set_fill_style(&JsValue::from(BACKGROUND));
        ctx.fill_rect(0.0, 0.0, area.width, area.height);
    }

    fn draw_model(&self, model: &ChartModel) {
        let Some(ctx) = self.context() else { return };
        let Some(area) = self.plot_area() else { return };

        self.paint_background(&ctx, area);

        for candle in &model.candles {
            let color = JsValue::from(candle.color.to_css());
            ctx.set_stroke_style(&color);
            ctx.set_fill_style(&color);

            // Wick
            ctx.begin_path();
            ctx.move_to(candle.x, candle.high_y);
            ctx.line_to(candle.x, candle.low_y);
            ctx.stroke();

            // Body; flat bars still get one visible pixel
            let top = candle.open_y.min(candle.close_y);
            let height = (candle.open_y - candle.close_y).abs().max(1.0);
            ctx.fill_rect(candle.x - candle.body_width / 2.0, top, candle.body_width, height);
        }

        ctx.set_line_width(MA_LINE_WIDTH);
        for line in &model.ma_polylines {
            ctx.set_stroke_style(&JsValue::from(line.color.to_css()));
            ctx.begin_path();
            let mut points = line.points.iter();
            if let Some(&(x, y)) = points.next() {
                ctx.move_to(x, y);
            }
            for &(x, y) in points {
                ctx.line_to(x, y);
            }
            ctx.stroke();
        }
        ctx.set_line_width(1.0);

        self.render_legend(model);
    }

    fn render_legend(&self, model: &ChartModel) {
        let Some(legend) = self.legend.as_ref() else { return };
        let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };

        legend.set_inner_html("");
        let display = if model.legend.is_empty() { "none" } else { "flex" };
        let _ = legend.set_attribute("style", &format!("display: {display}"));

        for entry in &model.legend {
            let Ok(item) = document.create_element("div") else { continue };
            item.set_class_name("legend-item");

            if let Ok(swatch) = document.create_element("div") {
                swatch.set_class_name("legend-color");
                let _ = swatch.set_attribute("style", &format!("background-color: {}", entry.color));
                let _ = item.append_child(&swatch);
            }
            if let Ok(label) = document.create_element("span") {
                label.set_text_content(Some(&entry.label));
                let _ = item.append_child(&label);
            }
            let _ = legend.append_child(&item);
        }
    }

    fn container_size(container: &Element) -> (u32, u32) {
        let width = container.client_width().max(0) as u32;
        let height = container.client_height().max(0) as u32;
        (width.max(1), if height == 0 { DEFAULT_HEIGHT } else { height })
    }
}

impl ChartAdapter for CanvasChart {
    /// Attach one canvas + legend to the container, tearing down anything a
    /// prior bind left behind.
    fn bind(&mut self, container_id: &str) -> Result<(), String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "document unavailable".to_string())?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| format!("container #{container_id} not found"))?;

        if let Some(old) = self.canvas.take() {
            old.remove();
        }
        if let Some(old) = self.legend.take() {
            old.remove();
        }

        let (width, height) = Self::container_size(&container);
        let canvas = document
            .create_element("canvas")
            .map_err(|_| "cannot create canvas".to_string())?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "cannot create canvas".to_string())?;
        canvas.set_class_name("chart-canvas");
        canvas.set_width(width);
        canvas.set_height(height);
        container.append_child(&canvas).map_err(|_| "cannot attach canvas".to_string())?;

        let legend = document
            .create_element("div")
            .map_err(|_| "cannot create legend".to_string())?;
        legend.set_class_name("chart-legend");
        let _ = legend.set_attribute("style", "display: none");
        container.append_child(&legend).map_err(|_| "cannot attach legend".to_string())?;

        get_logger().info(
            LogComponent::Infrastructure("CanvasChart"),
            &format!("🎨 Chart bound to #{container_id} ({width}x{height})"),
        );

        self.container = Some(container);
        self.canvas = Some(canvas);
        self.legend = Some(legend);
        self.last_series = None;
        Ok(())
    }

    /// Replace every displayed series. An empty series is a no-op and the
    /// previous frame stays visible.
    fn render(&mut self, series: &KlineSeries) {
        if series.is_empty() {
            log_warn!(LogComponent::Infrastructure("CanvasChart"), "Skipping render of empty series");
            return;
        }
        let Some(area) = self.plot_area() else { return };

        let model = build_chart_model(series, area);
        self.draw_model(&model);
        self.last_series = Some(series.clone());

        log_debug!(
            LogComponent::Infrastructure("CanvasChart"),
            "✅ Rendered {} candles / {} MA lines",
            model.candles.len(),
            model.ma_polylines.len()
        );
    }

    /// Empty all series but keep the widget alive.
    fn clear(&mut self) {
        self.last_series = None;
        if let (Some(ctx), Some(area)) = (self.context(), self.plot_area()) {
            self.paint_background(&ctx, area);
        }
        if let Some(legend) = self.legend.as_ref() {
            legend.set_inner_html("");
            let _ = legend.set_attribute("style", "display: none");
        }
    }

    /// Passive reaction to a layout change: adopt the container's current
    /// dimensions and redraw whatever was last rendered.
    fn resize(&mut self) {
        let Some(container) = self.container.as_ref() else { return };
        let (width, height) = Self::container_size(container);
        if let Some(canvas) = self.canvas.as_ref() {
            canvas.set_width(width);
            canvas.set_height(height);
        }
        if let Some(series) = self.last_series.clone() {
            let Some(area) = self.plot_area() else { return };
            let model = build_chart_model(&series, area);
            self.draw_model(&model);
        }
    }
}
