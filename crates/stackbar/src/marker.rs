use serde::Serialize;
use stackbar_core::{BarData, LocationAggregate};
use stackbar_render::{BarIconLayout, IconOptions, PopupTable, layout_bar_icon};

/// A location marker. The aggregate travels with the marker so clustering never has to read
/// chart data back out of icon options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMarker {
    pub aggregate: LocationAggregate,
    pub icon: IconOptions,
    pub popup: PopupTable,
}

impl BarMarker {
    pub fn new(aggregate: LocationAggregate, icon: IconOptions) -> Self {
        let popup = PopupTable::from_data(&aggregate.data);
        Self {
            aggregate,
            icon,
            popup,
        }
    }

    pub fn lat(&self) -> f64 {
        self.aggregate.lat
    }

    pub fn lng(&self) -> f64 {
        self.aggregate.lng
    }

    pub fn data(&self) -> &BarData {
        &self.aggregate.data
    }

    pub fn icon_layout(&self, zoom: f64) -> BarIconLayout {
        layout_bar_icon(&self.aggregate.data, &self.icon, zoom)
    }
}

/// Several markers drawn as one combined chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMarker {
    pub lat: f64,
    pub lng: f64,
    /// Indices into the tool's marker list.
    pub members: Vec<usize>,
    pub data: BarData,
    pub icon: IconOptions,
    pub popup: PopupTable,
}

impl ClusterMarker {
    pub fn icon_layout(&self, zoom: f64) -> BarIconLayout {
        layout_bar_icon(&self.data, &self.icon, zoom)
    }
}

/// What the layer shows at a given zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerItem<'a> {
    Marker { index: usize, marker: &'a BarMarker },
    Cluster(ClusterMarker),
}

impl LayerItem<'_> {
    pub fn lat_lng(&self) -> (f64, f64) {
        match self {
            Self::Marker { marker, .. } => (marker.lat(), marker.lng()),
            Self::Cluster(cluster) => (cluster.lat, cluster.lng),
        }
    }

    pub fn data(&self) -> &BarData {
        match self {
            Self::Marker { marker, .. } => marker.data(),
            Self::Cluster(cluster) => &cluster.data,
        }
    }

    pub fn popup(&self) -> &PopupTable {
        match self {
            Self::Marker { marker, .. } => &marker.popup,
            Self::Cluster(cluster) => &cluster.popup,
        }
    }

    pub fn icon_layout(&self, zoom: f64) -> BarIconLayout {
        match self {
            Self::Marker { marker, .. } => marker.icon_layout(zoom),
            Self::Cluster(cluster) => cluster.icon_layout(zoom),
        }
    }
}
