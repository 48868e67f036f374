//! Bindings to the global Leaflet object `L` and the adapter that renders
//! overlay descriptions onto a live map.

use js_sys::{Object, Reflect};
use serde::Serialize;
use verde_shared::geo::{LatLng, MapView, TileSource};
use verde_shared::{LayerId, MapSurface, Overlay};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = Layer)]
    pub type Layer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn new_map(element_id: &str, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: u8) -> LeafletMap;

    #[wasm_bindgen(method, js_name = zoomIn)]
    fn zoom_in(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(method, js_name = zoomOut)]
    fn zoom_out(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LeafletMap, layer: &Layer) -> LeafletMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &Layer) -> LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn layer_group() -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(position: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circle)]
    fn circle(center: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, html: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_to_group(this: &Layer, layer: &Layer) -> Layer;
}

/// True when the Leaflet script has been loaded into the page.
pub fn is_available() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::has(window.as_ref(), &JsValue::from_str("L")).unwrap_or(false)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn lat_lng(position: LatLng) -> JsValue {
    let [lat, lng] = position.to_array();
    js_sys::Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng)).into()
}

/// Create a map inside `element_id`, centered on `view` and backed by `tiles`.
pub fn create_map(
    element_id: &str,
    view: MapView,
    tiles: &TileSource,
    zoom_control: bool,
) -> Result<LeafletMap, JsValue> {
    let options = Object::new();
    Reflect::set(&options, &"zoomControl".into(), &JsValue::from_bool(zoom_control))?;
    let map = new_map(element_id, &options)?;
    map.set_view(&lat_lng(view.center), view.zoom);

    let tile_options = to_js(tiles)?;
    map.add_layer(&tile_layer(tiles.url_template, &tile_options));
    Ok(map)
}

/// Build the Leaflet layer for one overlay, popup included.
pub fn render_overlay(overlay: &Overlay) -> Result<Layer, JsValue> {
    let layer = match overlay {
        Overlay::Marker(marker_overlay) => {
            let options = Object::new();
            Reflect::set(&options, &"icon".into(), &div_icon(&to_js(&marker_overlay.icon)?))?;
            marker(&lat_lng(marker_overlay.position), &options)
        }
        Overlay::Circle(circle_overlay) => {
            circle(&lat_lng(circle_overlay.center), &to_js(&circle_overlay.style)?)
        }
    };

    if let Some(popup) = overlay.popup() {
        let options = match popup.options {
            Some(options) => to_js(&options)?,
            None => JsValue::UNDEFINED,
        };
        layer.bind_popup(&popup.to_html(), &options);
    }
    Ok(layer)
}

/// Add every overlay straight onto the map.
pub fn add_overlays<'a>(
    map: &LeafletMap,
    overlays: impl IntoIterator<Item = &'a Overlay>,
) -> Result<(), JsValue> {
    for overlay in overlays {
        map.add_layer(&render_overlay(overlay)?);
    }
    Ok(())
}

/// The overview map with its five toggleable layer groups.
pub struct LeafletSurface {
    map: LeafletMap,
    groups: Vec<(LayerId, Layer)>,
}

impl LeafletSurface {
    pub fn new(map: LeafletMap) -> Self {
        Self {
            map,
            groups: Vec::new(),
        }
    }

    /// Register a group holding `overlays`; it starts attached iff `visible`.
    pub fn add_group<'a>(
        &mut self,
        id: LayerId,
        overlays: impl IntoIterator<Item = &'a Overlay>,
        visible: bool,
    ) -> Result<(), JsValue> {
        let group = layer_group();
        for overlay in overlays {
            group.add_to_group(&render_overlay(overlay)?);
        }
        if visible {
            self.map.add_layer(&group);
        }
        self.groups.push((id, group));
        Ok(())
    }

    fn group(&self, id: LayerId) -> Option<&Layer> {
        self.groups
            .iter()
            .find(|(layer, _)| *layer == id)
            .map(|(_, group)| group)
    }
}

impl MapSurface for LeafletSurface {
    fn attach_layer(&mut self, layer: LayerId) {
        if let Some(group) = self.group(layer) {
            self.map.add_layer(group);
        }
    }

    fn detach_layer(&mut self, layer: LayerId) {
        if let Some(group) = self.group(layer) {
            self.map.remove_layer(group);
        }
    }

    fn zoom_in(&mut self) {
        self.map.zoom_in();
    }

    fn zoom_out(&mut self) {
        self.map.zoom_out();
    }

    fn set_view(&mut self, view: MapView) {
        self.map.set_view(&lat_lng(view.center), view.zoom);
    }
}
