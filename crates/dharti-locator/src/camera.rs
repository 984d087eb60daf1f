//! Camera director: turns a resolution into view commands and tracks whether
//! the globe or the flat map is showing.
//!
//! From the globe the order is fixed: fly the globe to the target, wait for
//! the animation to finish, load and show the map, draw the parcel overlay,
//! then frame the target. If the map provider cannot be loaded the view stays
//! on the globe.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dharti_core::config::CameraSettings;
use dharti_core::{Bounds, ExternalServiceError, LatLng};
use dharti_index::{ParcelIndex, ParcelOutline};

use crate::resolver::Resolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    Globe,
    Transitioning,
    Map,
}

/// What to frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusTarget {
    Point(LatLng),
    Path(Vec<LatLng>),
}

impl FocusTarget {
    /// A parcel's outline when the resolution names an indexed parcel,
    /// otherwise the bare point.
    pub fn for_resolution(resolution: &Resolution, index: &ParcelIndex) -> Self {
        resolution
            .parcel_id
            .as_deref()
            .and_then(|id| index.get(id))
            .map_or(Self::Point(resolution.point), |p| Self::Path(p.bounding_path.clone()))
    }

    /// Where the globe should fly to.
    pub fn anchor(&self) -> Option<LatLng> {
        match self {
            Self::Point(p) => Some(*p),
            Self::Path(path) => LatLng::centroid(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavCommand {
    /// Animated globe rotation. Completes when the animation ends.
    FlyTo { target: LatLng, duration_ms: u64 },
    ShowMap,
    ShowGlobe,
    OverlayParcels(Vec<ParcelOutline>),
    FitBounds { bounds: Bounds, padding_px: u32 },
    /// Cosmetic; the surface applies it `after_ms` after the fit.
    TiltHeading { tilt_deg: f64, heading_deg: f64, after_ms: u64 },
    CenterOn { point: LatLng, zoom: u8 },
    Pulse { at: LatLng },
}

/// The globe/map presentation the director drives.
pub trait ViewSurface: Send + Sync {
    /// Load the map provider. Called before the first switch to the map.
    fn load_map(&self) -> BoxFuture<'_, Result<(), ExternalServiceError>>;

    /// Apply one command; `FlyTo` resolves once its animation has finished.
    fn execute<'a>(&'a self, command: &'a NavCommand) -> BoxFuture<'a, ()>;
}

/// Commands that frame `target` on an already visible map.
pub fn plan_focus(target: &FocusTarget, settings: &CameraSettings) -> Vec<NavCommand> {
    match target {
        FocusTarget::Path(path) => {
            let (Some(bounds), Some(centroid)) = (Bounds::enclosing(path), LatLng::centroid(path))
            else {
                return Vec::new();
            };
            vec![
                NavCommand::FitBounds { bounds, padding_px: settings.fit_padding_px },
                NavCommand::TiltHeading {
                    tilt_deg: settings.tilt_deg,
                    heading_deg: settings.heading_deg,
                    after_ms: settings.tilt_delay_ms,
                },
                NavCommand::Pulse { at: centroid },
            ]
        }
        FocusTarget::Point(point) => {
            vec![NavCommand::CenterOn { point: *point, zoom: settings.point_zoom }]
        }
    }
}

pub struct CameraDirector<V> {
    view: V,
    mode: ViewMode,
    settings: CameraSettings,
}

impl<V: ViewSurface> CameraDirector<V> {
    pub fn new(view: V, settings: CameraSettings) -> Self {
        Self { view, mode: ViewMode::Globe, settings }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Navigate to `target`. `overlay` is drawn when the map first appears.
    ///
    /// On a map-provider failure the director is back on [`ViewMode::Globe`]
    /// and the error is returned for the caller to show.
    pub async fn focus(
        &mut self,
        target: &FocusTarget,
        overlay: &[ParcelOutline],
    ) -> Result<ViewMode, ExternalServiceError> {
        if self.mode != ViewMode::Map {
            self.mode = ViewMode::Transitioning;
            if let Some(anchor) = target.anchor() {
                let fly = NavCommand::FlyTo {
                    target: anchor,
                    duration_ms: self.settings.fly_duration_ms,
                };
                self.view.execute(&fly).await;
            }
            if let Err(e) = self.view.load_map().await {
                warn!(error = %e, "map unavailable, staying on globe");
                self.mode = ViewMode::Globe;
                return Err(e);
            }
            self.view.execute(&NavCommand::ShowMap).await;
            self.view.execute(&NavCommand::OverlayParcels(overlay.to_vec())).await;
            self.mode = ViewMode::Map;
            debug!("switched to map view");
        }
        for command in plan_focus(target, &self.settings) {
            self.view.execute(&command).await;
        }
        Ok(self.mode)
    }

    /// Back to the initial globe.
    pub async fn reset(&mut self) {
        if self.mode != ViewMode::Globe {
            self.view.execute(&NavCommand::ShowGlobe).await;
        }
        self.mode = ViewMode::Globe;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_path_fits_exact_bounds() {
        let square = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ];
        let plan = plan_focus(&FocusTarget::Path(square), &CameraSettings::default());
        assert_eq!(
            plan[0],
            NavCommand::FitBounds {
                bounds: Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 0.0, max_lng: 1.0 },
                padding_px: 48
            }
        );
        assert!(matches!(plan[1], NavCommand::TiltHeading { after_ms: 450, .. }));
        assert_eq!(plan[2], NavCommand::Pulse { at: LatLng::new(0.5, 0.5) });
    }

    #[test]
    fn point_centers_at_fixed_zoom() {
        let delhi = LatLng::new(28.6139, 77.209);
        let plan = plan_focus(&FocusTarget::Point(delhi), &CameraSettings::default());
        assert_eq!(plan, vec![NavCommand::CenterOn { point: delhi, zoom: 16 }]);
    }

    #[test]
    fn empty_path_plans_nothing() {
        assert!(plan_focus(&FocusTarget::Path(Vec::new()), &CameraSettings::default()).is_empty());
        assert!(FocusTarget::Path(Vec::new()).anchor().is_none());
    }
}
