//! Browser host built on `web-sys`.
//!
//! [`mount`] wires the four native drag events of a board element to a
//! [`KanbanDnd`] controller. The returned [`Mounted`] value owns every
//! listener and removes them when dropped, so unmounting the board is just
//! dropping the handle. [`KanbanDndHook`] exposes the same lifecycle to
//! JavaScript.

use crate::{
    dnd::{KanbanDnd, MutationSink},
    domain::{BoundingBox, DndConfig, MutationRequest},
    error::{DndError, Result},
    host::BoardDom,
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{DragEvent, Element, EventTarget, HtmlCollection, Node, NodeList};

/// Board rooted at the element the hook is mounted on
pub struct WebBoard {
    root: Element,
}

impl WebBoard {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    fn contains(&self, el: &Element) -> bool {
        let node: &Node = el;
        self.root.contains(Some(node))
    }
}

fn collection_elements(collection: &HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

fn node_list_elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_all(el: &Element, selector: &str) -> Vec<Element> {
    match el.query_selector_all(selector) {
        Ok(list) => node_list_elements(&list),
        Err(err) => {
            tracing::warn!(selector, ?err, "selector query failed");
            Vec::new()
        }
    }
}

impl BoardDom for WebBoard {
    type Element = Element;

    fn closest_with_attr(&self, el: &Element, attr: &str) -> Option<Element> {
        match el.closest(&format!("[{}]", attr)) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(attr, ?err, "closest lookup failed");
                None
            }
        }
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn element_id(&self, el: &Element) -> Option<String> {
        Some(el.id()).filter(|id| !id.is_empty())
    }

    fn parent(&self, el: &Element) -> Option<Element> {
        el.parent_element()
    }

    fn children(&self, el: &Element) -> Vec<Element> {
        collection_elements(&el.children())
    }

    fn descendants(&self, el: &Element) -> Vec<Element> {
        query_all(el, "*")
    }

    fn bounding_box(&self, el: &Element) -> BoundingBox {
        let rect = el.get_bounding_client_rect();
        BoundingBox::new(rect.top(), rect.height())
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.root
            .owner_document()
            .and_then(|doc| doc.get_element_by_id(id))
            .filter(|el| self.contains(el))
    }

    fn dropzones(&self, dropzone_attr: &str) -> Vec<Element> {
        query_all(&self.root, &format!("[{}]", dropzone_attr))
    }

    fn add_class(&mut self, el: &Element, class: &str) {
        if let Err(err) = el.class_list().add_1(class) {
            tracing::warn!(class, ?err, "failed to add class");
        }
    }

    fn remove_class(&mut self, el: &Element, class: &str) {
        if let Err(err) = el.class_list().remove_1(class) {
            tracing::warn!(class, ?err, "failed to remove class");
        }
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn insert_before(&mut self, parent: &Element, child: &Element, reference: Option<&Element>) {
        let child: &Node = child;
        let reference: Option<&Node> = reference.map(AsRef::<Node>::as_ref);
        if let Err(err) = parent.insert_before(child, reference) {
            tracing::warn!(?err, "failed to move dragged card");
        }
    }
}

/// Pushes drop mutations to a JavaScript callback as `(event, payload)`
pub struct CallbackSink {
    event: String,
    callback: js_sys::Function,
}

impl CallbackSink {
    pub fn new(event: impl Into<String>, callback: js_sys::Function) -> Self {
        Self {
            event: event.into(),
            callback,
        }
    }

    fn payload(request: &MutationRequest) -> Result<JsValue> {
        let json = serde_json::to_string(request)?;
        Ok(js_sys::JSON::parse(&json)?)
    }
}

impl MutationSink for CallbackSink {
    fn submit(&mut self, request: MutationRequest) {
        let payload = match Self::payload(&request) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(%err, "could not encode mutation request");
                return;
            }
        };

        if let Err(err) = self
            .callback
            .call2(&JsValue::NULL, &JsValue::from_str(&self.event), &payload)
        {
            tracing::warn!(err = %DndError::from(err), "drop callback failed");
        }
    }
}

type DragCallback = Closure<dyn FnMut(DragEvent)>;

/// One registered listener, removed again on drop
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: DragCallback,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            tracing::warn!(kind = self.kind, ?err, "failed to remove listener");
        }
    }
}

/// A controller attached to a live board element
pub struct Mounted<S: MutationSink> {
    controller: Rc<RefCell<KanbanDnd<WebBoard, S>>>,
    listeners: Vec<Listener>,
}

impl<S: MutationSink> Mounted<S> {
    pub fn controller(&self) -> &Rc<RefCell<KanbanDnd<WebBoard, S>>> {
        &self.controller
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn listen(&mut self, target: &EventTarget, kind: &'static str, callback: DragCallback) -> Result<()> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }
}

fn event_element(target: Option<EventTarget>) -> Option<Element> {
    target.and_then(|t| t.dyn_into::<Element>().ok())
}

/// Attaches drag handling to `root` and the dropzones currently inside it.
///
/// Dropzones rendered after mounting are not picked up; remount after the
/// board's column set changes.
pub fn mount<S>(root: Element, sink: S, config: DndConfig) -> Result<Mounted<S>>
where
    S: MutationSink + 'static,
{
    config.validate()?;
    let dropzone_attr = config.dropzone_attr.clone();
    let controller = Rc::new(RefCell::new(KanbanDnd::new(
        WebBoard::new(root.clone()),
        sink,
        config,
    )));
    let mut mounted = Mounted {
        controller: Rc::clone(&controller),
        listeners: Vec::new(),
    };
    let root_target: &EventTarget = &root;

    let dnd = Rc::clone(&controller);
    let on_drag_start = DragCallback::new(move |event: DragEvent| {
        let Some(target) = event_element(event.target()) else {
            return;
        };
        let transfer = dnd.borrow_mut().drag_start(&target);
        if let (Some(transfer), Some(data)) = (transfer, event.data_transfer()) {
            data.set_effect_allowed(transfer.effect_allowed);
            if let Err(err) = data.set_data(transfer.format, &transfer.data) {
                tracing::warn!(?err, "failed to set drag data");
            }
        }
    });
    mounted.listen(root_target, "dragstart", on_drag_start)?;

    let dnd = Rc::clone(&controller);
    let on_drag_end = DragCallback::new(move |event: DragEvent| {
        let target = event_element(event.target());
        dnd.borrow_mut().drag_end(target.as_ref());
    });
    mounted.listen(root_target, "dragend", on_drag_end)?;

    let zones = controller.borrow().dom().dropzones(&dropzone_attr);
    for zone in zones {
        let zone_target: &EventTarget = &zone;

        let dnd = Rc::clone(&controller);
        let on_drag_over = DragCallback::new(move |event: DragEvent| {
            let Some(zone) = event_element(event.current_target()) else {
                return;
            };
            let y = f64::from(event.client_y());
            if dnd.borrow_mut().drag_over(&zone, y).should_prevent_default() {
                event.prevent_default();
            }
        });
        mounted.listen(zone_target, "dragover", on_drag_over)?;

        let dnd = Rc::clone(&controller);
        let on_drop = DragCallback::new(move |event: DragEvent| {
            let Some(zone) = event_element(event.current_target()) else {
                return;
            };
            if dnd.borrow_mut().commit_drop(&zone).should_prevent_default() {
                event.prevent_default();
            }
        });
        mounted.listen(zone_target, "drop", on_drop)?;
    }

    tracing::debug!(listeners = mounted.listener_count(), "kanban drag-and-drop mounted");
    Ok(mounted)
}

/// JavaScript handle for a mounted board.
///
/// Construct it when the board element mounts and call `free()` when it is
/// destroyed; freeing removes every listener.
#[wasm_bindgen]
pub struct KanbanDndHook {
    mounted: Mounted<CallbackSink>,
}

#[wasm_bindgen]
impl KanbanDndHook {
    /// `push_event` is called as `push_event(eventName, payload)` on drop.
    /// `config` is an optional JSON object overriding the naming conventions.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: Element,
        push_event: js_sys::Function,
        config: Option<String>,
    ) -> std::result::Result<KanbanDndHook, JsValue> {
        let config = match config {
            Some(json) => DndConfig::from_json_str(&json)?,
            None => DndConfig::default(),
        };
        let sink = CallbackSink::new(config.drop_event.clone(), push_event);
        let mounted = mount(root, sink, config)?;
        Ok(Self { mounted })
    }

    /// Whether a drag is currently in flight
    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.mounted.controller().borrow().session().is_some()
    }
}
