//! The bar layer tool: owns settings, aggregates and markers, and runs render passes.
//!
//! A render pass always runs to completion. `Layer` and `Data` passes rebuild the location
//! aggregates from the record source before rebuilding markers; `Style` passes reuse the
//! aggregates and only rebuild markers with the current style settings.

use crate::marker::{BarMarker, ClusterMarker, LayerItem};
use stackbar_core::{
    Aggregator, BarLayerDimensions, BarLayerSettings, BarLayerToolConfig, ColorRule, Dimension,
    LocationAggregate, RecordSource, Result, merge_bar_data,
};
use stackbar_render::{ClusterOptions, IconOptions, PopupTable, cluster_points};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderType {
    Layer,
    Data,
    Style,
}

impl RenderType {
    /// The pass a change of `dimension` requires.
    pub fn for_dimension(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Latitude | Dimension::Longitude => Self::Layer,
            Dimension::LocationName
            | Dimension::Aggregation
            | Dimension::Value
            | Dimension::PrimaryCategory
            | Dimension::SecondaryCategory => Self::Data,
            _ => Self::Style,
        }
    }

    fn rebuilds_data(self) -> bool {
        matches!(self, Self::Layer | Self::Data)
    }
}

/// Notifications delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    DataChanged,
    SelectionChanged,
}

/// Mutable state of the tool between render passes.
#[derive(Debug, Clone, Default)]
pub struct BarLayerToolState {
    settings: BarLayerSettings,
    work_data: Vec<LocationAggregate>,
    markers: Vec<BarMarker>,
}

impl BarLayerToolState {
    pub fn new(settings: BarLayerSettings) -> Self {
        Self {
            settings,
            work_data: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &BarLayerSettings {
        &self.settings
    }

    pub fn dimensions(&self) -> &BarLayerDimensions {
        &self.settings.dimensions
    }

    pub fn category_color_rules(&self) -> &[ColorRule] {
        &self.settings.category_color_rules
    }

    pub fn set_category_color_rules(&mut self, rules: Vec<ColorRule>) {
        self.settings.category_color_rules = rules;
    }

    pub fn work_data(&self) -> &[LocationAggregate] {
        &self.work_data
    }

    pub fn set_work_data(&mut self, work_data: Vec<LocationAggregate>) {
        self.work_data = work_data;
    }

    pub fn markers(&self) -> &[BarMarker] {
        &self.markers
    }

    pub fn set_markers(&mut self, markers: Vec<BarMarker>) {
        self.markers = markers;
    }

    pub fn deserialize(&mut self, config: &BarLayerToolConfig) {
        self.settings.deserialize(config);
    }

    pub fn serialize(&self) -> BarLayerToolConfig {
        self.settings.serialize()
    }
}

#[derive(Debug, Clone)]
pub struct BarLayerTool<S> {
    source: S,
    state: BarLayerToolState,
    cluster_options: ClusterOptions,
}

impl<S: RecordSource> BarLayerTool<S> {
    pub fn new(source: S) -> Self {
        Self::with_settings(source, BarLayerSettings::default())
    }

    pub fn from_config(source: S, config: &BarLayerToolConfig) -> Self {
        Self::with_settings(source, BarLayerSettings::from_config(config))
    }

    /// Creates the tool and runs the initial `Layer` pass.
    pub fn with_settings(source: S, settings: BarLayerSettings) -> Self {
        let mut tool = Self {
            source,
            state: BarLayerToolState::new(settings),
            cluster_options: ClusterOptions::default(),
        };
        tool.render(RenderType::Layer);
        tool
    }

    pub fn with_cluster_options(mut self, options: ClusterOptions) -> Self {
        self.cluster_options = options;
        self
    }

    pub fn state(&self) -> &BarLayerToolState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn markers(&self) -> &[BarMarker] {
        self.state.markers()
    }

    /// Swaps the record source; the caller decides when to re-render (usually via
    /// [`Event::DataChanged`]).
    pub fn replace_source(&mut self, source: S) -> S {
        std::mem::replace(&mut self.source, source)
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::DataChanged => self.render(RenderType::Data),
            Event::SelectionChanged => self.render(RenderType::Style),
        }
    }

    /// Changes one dimension and runs the pass that change requires.
    pub fn update_dimension(&mut self, dimension: Dimension, value: &str) -> Result<RenderType> {
        self.state.settings.dimensions.set(dimension, value)?;
        let render_type = RenderType::for_dimension(dimension);
        self.render(render_type);
        Ok(render_type)
    }

    /// Replaces the color rules. Colors are resolved while aggregating, so this is a data pass.
    pub fn set_category_color_rules(&mut self, rules: Vec<ColorRule>) {
        self.state.set_category_color_rules(rules);
        self.render(RenderType::Data);
    }

    /// Applies a config and re-renders from the data.
    pub fn deserialize(&mut self, config: &BarLayerToolConfig) {
        self.state.deserialize(config);
        self.render(RenderType::Layer);
    }

    pub fn serialize(&self) -> BarLayerToolConfig {
        self.state.serialize()
    }

    pub fn render(&mut self, render_type: RenderType) {
        if !self.state.settings.enabled {
            self.state.set_work_data(Vec::new());
            self.state.set_markers(Vec::new());
            return;
        }

        if render_type.rebuilds_data() {
            self.prepare_map_data();
        }
        self.create_markers();

        tracing::debug!(
            ?render_type,
            locations = self.state.work_data().len(),
            markers = self.state.markers().len(),
            "render pass finished"
        );
    }

    fn prepare_map_data(&mut self) {
        let settings = &self.state.settings;
        let work_data = match settings.dimensions.record_dimensions() {
            Some(dims) => Aggregator::new(
                &dims,
                settings.dimensions.aggregation,
                &settings.category_color_rules,
            )
            .aggregate(&self.source),
            None => {
                tracing::debug!("record dimensions incomplete; layer stays empty");
                Vec::new()
            }
        };
        self.state.set_work_data(work_data);
    }

    fn icon_options(&self, is_group: bool) -> IconOptions {
        let dims = self.state.dimensions();
        IconOptions {
            is_group,
            chart_size: dims.chart_size,
            chart_color: Some(dims.chart_color.clone()),
            show_axis_labels: dims.show_axis_labels,
        }
    }

    fn create_markers(&mut self) {
        let icon = self.icon_options(false);
        let markers = self
            .state
            .work_data()
            .iter()
            .cloned()
            .map(|aggregate| BarMarker::new(aggregate, icon.clone()))
            .collect();
        self.state.set_markers(markers);
    }

    /// Merges the data of the given markers into one cluster.
    pub fn cluster_data(&self, members: &[usize]) -> stackbar_core::BarData {
        let markers = self.state.markers();
        merge_bar_data(members.iter().filter_map(|&i| markers.get(i)).map(BarMarker::data))
    }

    /// Markers and clusters as drawn at `zoom`. Groups of one marker stay plain markers.
    pub fn layer_items(&self, zoom: f64) -> Vec<LayerItem<'_>> {
        let markers = self.state.markers();
        let points: Vec<(f64, f64)> = markers.iter().map(|m| (m.lat(), m.lng())).collect();

        cluster_points(&points, zoom, &self.cluster_options)
            .into_iter()
            .map(|group| {
                if group.members.len() == 1 {
                    let index = group.members[0];
                    return LayerItem::Marker {
                        index,
                        marker: &markers[index],
                    };
                }
                let data = self.cluster_data(&group.members);
                let popup = PopupTable::from_data(&data);
                LayerItem::Cluster(ClusterMarker {
                    lat: group.lat,
                    lng: group.lng,
                    members: group.members,
                    data,
                    icon: self.icon_options(true),
                    popup,
                })
            })
            .collect()
    }

    /// Only the multi-marker groups at `zoom`.
    pub fn clusters(&self, zoom: f64) -> Vec<ClusterMarker> {
        self.layer_items(zoom)
            .into_iter()
            .filter_map(|item| match item {
                LayerItem::Cluster(cluster) => Some(cluster),
                LayerItem::Marker { .. } => None,
            })
            .collect()
    }
}
