use crate::{
    dnd::{
        insertion::drag_after_element,
        ordering::ordered_ids,
        session::{DragSession, SessionSlot},
        sink::MutationSink,
    },
    domain::{ColumnId, DndConfig, MutationRequest, TicketId},
    host::BoardDom,
};

/// Native drag events the board forwards to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent<E> {
    /// A drag began on `target` (the card or something inside it)
    DragStart { target: E },
    /// The pointer moved over `zone` at viewport height `y`
    DragOver { zone: E, y: f64 },
    /// The card was released over `zone`
    Drop { zone: E },
    /// The drag finished, with or without a drop
    DragEnd { target: Option<E> },
}

/// Whether the host should suppress the browser's default action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Ignored,
}

impl EventOutcome {
    pub fn should_prevent_default(self) -> bool {
        self == Self::Handled
    }
}

/// What the host writes into the native data transfer on drag-start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferData {
    pub effect_allowed: &'static str,
    pub format: &'static str,
    pub data: String,
}

/// Drag-and-drop controller for one mounted board.
///
/// Owns the drag session and turns drag events into optimistic card moves
/// on the board, and drops into [`MutationRequest`]s for the sink.
pub struct KanbanDnd<D: BoardDom, S: MutationSink> {
    dom: D,
    sink: S,
    config: DndConfig,
    session: SessionSlot,
}

impl<D: BoardDom, S: MutationSink> KanbanDnd<D, S> {
    pub fn new(dom: D, sink: S, config: DndConfig) -> Self {
        Self {
            dom,
            sink,
            config,
            session: SessionSlot::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &DndConfig {
        &self.config
    }

    /// The drag in flight, if any
    pub fn session(&self) -> Option<&DragSession> {
        self.session.current()
    }

    /// Dispatches a native event to the matching handler
    pub fn handle(&mut self, event: BoardEvent<D::Element>) -> EventOutcome {
        match event {
            BoardEvent::DragStart { target } => match self.drag_start(&target) {
                Some(_) => EventOutcome::Handled,
                None => EventOutcome::Ignored,
            },
            BoardEvent::DragOver { zone, y } => self.drag_over(&zone, y),
            BoardEvent::Drop { zone } => self.commit_drop(&zone),
            BoardEvent::DragEnd { target } => {
                self.drag_end(target.as_ref());
                EventOutcome::Handled
            }
        }
    }

    /// Starts a session for the card under `target`.
    ///
    /// Returns `None` without touching the session when the target is not
    /// inside a card, or the card lacks its ticket or column id.
    pub fn drag_start(&mut self, target: &D::Element) -> Option<TransferData> {
        let Some(card) = self.dom.closest_with_attr(target, &self.config.ticket_attr) else {
            tracing::trace!("drag started outside any card");
            return None;
        };

        let ticket_id = self.non_empty_attr(&card, &self.config.ticket_attr);
        let from_column = self.non_empty_attr(&card, &self.config.column_attr);
        let (Some(ticket_id), Some(from_column)) = (ticket_id, from_column) else {
            tracing::debug!("card is missing its ticket or column id, drag not started");
            return None;
        };

        let ticket_id = TicketId::new(ticket_id);
        tracing::debug!(%ticket_id, %from_column, "drag started");

        self.dom.add_class(&card, &self.config.dragging_class);
        self.session
            .begin(ticket_id.clone(), ColumnId::new(from_column));

        Some(TransferData {
            effect_allowed: "move",
            format: "text/plain",
            data: ticket_id.to_string(),
        })
    }

    /// Previews the drop by moving the dragged card into `zone` at `y`.
    ///
    /// Repeating the call with the same pointer position leaves the board
    /// unchanged.
    pub fn drag_over(&mut self, zone: &D::Element, y: f64) -> EventOutcome {
        let Some(session) = self.session.current() else {
            return EventOutcome::Ignored;
        };
        if self.zone_column(zone).is_none() {
            return EventOutcome::Ignored;
        }

        let dragged_id = session.ticket_id.dom_id(&self.config.card_id_prefix);
        for class in &self.config.highlight_classes {
            self.dom.add_class(zone, class);
        }

        let Some(dragged) = self.dom.element_by_id(&dragged_id) else {
            tracing::debug!(%dragged_id, "dragged card no longer on the board");
            return EventOutcome::Handled;
        };

        let after = drag_after_element(&self.dom, zone, &dragged, y, &self.config.card_id_prefix);
        self.dom.insert_before(zone, &dragged, after.as_ref());

        EventOutcome::Handled
    }

    /// Commits the drop on `zone` as a mutation request and ends the session
    pub fn commit_drop(&mut self, zone: &D::Element) -> EventOutcome {
        let Some(session) = self.session.current().cloned() else {
            return EventOutcome::Ignored;
        };
        let Some(to_column) = self.zone_column(zone) else {
            return EventOutcome::Ignored;
        };

        let from_ordered_ids = self.column_order(&session.from_column);
        let to_ordered_ids = self.column_order(&to_column);

        let request = MutationRequest {
            ticket_id: session.ticket_id,
            from_column: session.from_column,
            to_column,
            from_ordered_ids,
            to_ordered_ids,
        };
        tracing::debug!(
            ticket_id = %request.ticket_id,
            from_column = %request.from_column,
            to_column = %request.to_column,
            "drop committed"
        );
        self.sink.submit(request);
        self.end_session(None);

        EventOutcome::Handled
    }

    /// Clears the session and every drag marker, whether or not a drop ran
    pub fn drag_end(&mut self, target: Option<&D::Element>) {
        self.end_session(target);
    }

    fn end_session(&mut self, target: Option<&D::Element>) {
        let ended = self.session.end();

        let target_card =
            target.and_then(|t| self.dom.closest_with_attr(t, &self.config.ticket_attr));
        let session_card = ended.as_ref().and_then(|s| {
            self.dom
                .element_by_id(&s.ticket_id.dom_id(&self.config.card_id_prefix))
        });
        for card in target_card.iter().chain(session_card.iter()) {
            self.dom.remove_class(card, &self.config.dragging_class);
        }

        for zone in self.dom.dropzones(&self.config.dropzone_attr) {
            for class in &self.config.highlight_classes {
                self.dom.remove_class(&zone, class);
            }
        }

        if let Some(session) = ended {
            tracing::trace!(ticket_id = %session.ticket_id, "drag session ended");
        }
    }

    /// Column id of a dropzone; `None` when `el` is not a usable dropzone
    fn zone_column(&self, el: &D::Element) -> Option<ColumnId> {
        self.dom.attribute(el, &self.config.dropzone_attr)?;
        match self.non_empty_attr(el, &self.config.column_attr) {
            Some(column) => Some(ColumnId::new(column)),
            None => {
                tracing::debug!("dropzone without a column id ignored");
                None
            }
        }
    }

    fn column_order(&self, column: &ColumnId) -> Vec<TicketId> {
        let zone = self
            .dom
            .dropzones(&self.config.dropzone_attr)
            .into_iter()
            .find(|zone| {
                self.dom.attribute(zone, &self.config.column_attr).as_deref()
                    == Some(column.as_str())
            });

        match zone {
            Some(zone) => ordered_ids(&self.dom, &zone, &self.config.card_id_prefix),
            None => {
                tracing::debug!(%column, "no dropzone for column, reporting empty order");
                Vec::new()
            }
        }
    }

    fn non_empty_attr(&self, el: &D::Element, name: &str) -> Option<String> {
        self.dom.attribute(el, name).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dnd::sink::RecordingSink,
        host::memory::{MemoryBoard, NodeRef},
    };

    type Controller = KanbanDnd<MemoryBoard, RecordingSink>;

    fn controller(columns: &[(&str, &[&str])]) -> (Controller, RecordingSink) {
        let config = DndConfig::default();
        let board = MemoryBoard::from_columns(config.clone(), columns);
        let sink = RecordingSink::new();
        (KanbanDnd::new(board, sink.clone(), config), sink)
    }

    fn card(dnd: &Controller, ticket: &str) -> NodeRef {
        dnd.dom()
            .element_by_id(&format!("kanban-ticket-{}", ticket))
            .unwrap()
    }

    fn zone(dnd: &Controller, column: &str) -> NodeRef {
        dnd.dom().column(column).unwrap()
    }

    fn order(dnd: &Controller, column: &str) -> Vec<String> {
        ordered_ids(dnd.dom(), &zone(dnd, column), "kanban-ticket-")
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    fn ids(raw: &[&str]) -> Vec<TicketId> {
        raw.iter().map(|id| TicketId::new(*id)).collect()
    }

    fn any_highlight(dnd: &Controller) -> bool {
        dnd.dom()
            .dropzones("data-kanban-dropzone")
            .iter()
            .any(|z| dnd.dom().has_class(z, "ring-2") || dnd.dom().has_class(z, "ring-primary/30"))
    }

    #[test]
    fn test_drag_start_creates_session() {
        let (mut dnd, _) = controller(&[("backlog", &["T1", "T2"])]);
        let t1 = card(&dnd, "T1");

        let transfer = dnd.drag_start(&t1).unwrap();

        assert_eq!(transfer.data, "T1");
        assert_eq!(transfer.effect_allowed, "move");
        assert_eq!(transfer.format, "text/plain");
        let session = dnd.session().unwrap();
        assert_eq!(session.ticket_id.as_str(), "T1");
        assert_eq!(session.from_column.as_str(), "backlog");
        assert!(dnd.dom().has_class(&t1, "opacity-60"));
    }

    #[test]
    fn test_drag_start_from_inner_element() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"])]);
        let t1 = card(&dnd, "T1");
        let title = dnd.dom_mut().add_element(t1, 0.0);

        assert!(dnd.drag_start(&title).is_some());
        assert_eq!(dnd.session().unwrap().ticket_id.as_str(), "T1");
    }

    #[test]
    fn test_drag_start_outside_card_is_ignored() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"])]);
        let backlog = zone(&dnd, "backlog");

        assert!(dnd.drag_start(&backlog).is_none());
        assert!(dnd.session().is_none());
    }

    #[test]
    fn test_drag_start_on_malformed_card_is_ignored() {
        let (mut dnd, _) = controller(&[("backlog", &["T1", "T2"])]);
        let t1 = card(&dnd, "T1");
        let t2 = card(&dnd, "T2");
        dnd.dom_mut().remove_attribute(t1, "data-kanban-column");
        dnd.dom_mut().set_attribute(t2, "data-ticket-id", "");

        assert!(dnd.drag_start(&t1).is_none());
        assert!(dnd.drag_start(&t2).is_none());
        assert!(dnd.session().is_none());
        assert!(!dnd.dom().has_class(&t1, "opacity-60"));
    }

    #[test]
    fn test_second_drag_start_replaces_session() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"]), ("done", &["T2"])]);
        let t1 = card(&dnd, "T1");
        let t2 = card(&dnd, "T2");

        dnd.drag_start(&t1);
        dnd.drag_start(&t2);

        let session = dnd.session().unwrap();
        assert_eq!(session.ticket_id.as_str(), "T2");
        assert_eq!(session.from_column.as_str(), "done");

        dnd.drag_end(Some(&t2));
        assert!(dnd.session().is_none());
    }

    #[test]
    fn test_drag_over_without_session_is_ignored() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"])]);
        let backlog = zone(&dnd, "backlog");

        assert_eq!(dnd.drag_over(&backlog, 0.0), EventOutcome::Ignored);
        assert!(!any_highlight(&dnd));
    }

    #[test]
    fn test_drag_over_non_dropzone_is_ignored() {
        let (mut dnd, _) = controller(&[("backlog", &["T1", "T2"])]);
        let t1 = card(&dnd, "T1");
        let t2 = card(&dnd, "T2");
        dnd.drag_start(&t1);

        assert_eq!(dnd.drag_over(&t2, 0.0), EventOutcome::Ignored);
        assert_eq!(order(&dnd, "backlog"), vec!["T1", "T2"]);
    }

    #[test]
    fn test_drag_over_moves_card_and_highlights() {
        let (mut dnd, _) = controller(&[("backlog", &["T1", "T2"]), ("done", &["D1", "D2"])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");
        dnd.drag_start(&t1);

        // Between D1 (mid 20) and D2 (mid 60)
        let outcome = dnd.drag_over(&done, 35.0);

        assert!(outcome.should_prevent_default());
        assert_eq!(order(&dnd, "done"), vec!["D1", "T1", "D2"]);
        assert_eq!(order(&dnd, "backlog"), vec!["T2"]);
        assert!(dnd.dom().has_class(&done, "ring-2"));
        assert!(dnd.dom().has_class(&done, "ring-primary/30"));
    }

    #[test]
    fn test_drag_over_above_nested_card_inserts_before_its_wrapper() {
        let (mut dnd, sink) = controller(&[("backlog", &["D"]), ("done", &["A"])]);
        let d = card(&dnd, "D");
        let a = card(&dnd, "A");
        let done = zone(&dnd, "done");

        // done = [wrapper{N}, A]
        let wrapper = dnd.dom_mut().add_element(done, 0.0);
        dnd.dom_mut().insert_before(&done, &wrapper, Some(&a));
        let nested = dnd.dom_mut().add_element(wrapper, 40.0);
        dnd.dom_mut().set_id(nested, Some("kanban-ticket-N"));

        dnd.drag_start(&d);
        dnd.drag_over(&done, 5.0);

        assert_eq!(dnd.dom().children(&done), vec![d, wrapper, a]);
        assert_eq!(order(&dnd, "done"), vec!["D", "A"]);

        dnd.commit_drop(&done);
        assert_eq!(sink.requests()[0].to_ordered_ids, ids(&["D", "A"]));
    }

    #[test]
    fn test_drag_over_below_all_cards_appends() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"]), ("done", &["D1", "D2"])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");
        dnd.drag_start(&t1);

        dnd.drag_over(&done, 400.0);

        assert_eq!(order(&dnd, "done"), vec!["D1", "D2", "T1"]);
    }

    #[test]
    fn test_drag_over_empty_column_appends() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"]), ("done", &[])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");
        dnd.drag_start(&t1);

        dnd.drag_over(&done, 0.0);

        assert_eq!(order(&dnd, "done"), vec!["T1"]);
        assert!(order(&dnd, "backlog").is_empty());
    }

    #[test]
    fn test_drag_over_is_idempotent() {
        let (mut dnd, _) = controller(&[("backlog", &["A", "B", "C"])]);
        let c = card(&dnd, "C");
        let backlog = zone(&dnd, "backlog");
        dnd.drag_start(&c);

        dnd.drag_over(&backlog, 5.0);
        let once = order(&dnd, "backlog");
        dnd.drag_over(&backlog, 5.0);

        assert_eq!(once, vec!["C", "A", "B"]);
        assert_eq!(order(&dnd, "backlog"), once);
    }

    #[test]
    fn test_drag_over_with_vanished_card_is_noop() {
        let (mut dnd, _) = controller(&[("backlog", &["T1", "T2"]), ("done", &["D1"])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");
        dnd.drag_start(&t1);
        dnd.dom_mut().detach(t1);

        // Still handled so the drop stays permitted
        assert_eq!(dnd.drag_over(&done, 0.0), EventOutcome::Handled);
        assert_eq!(order(&dnd, "done"), vec!["D1"]);
        assert!(dnd.dom().has_class(&done, "ring-2"));
    }

    #[test]
    fn test_drop_payload_across_columns() {
        let (mut dnd, sink) = controller(&[("backlog", &["T3", "T7", "T9"]), ("done", &["T1", "T2"])]);
        let t7 = card(&dnd, "T7");
        let done = zone(&dnd, "done");

        dnd.drag_start(&t7);
        dnd.drag_over(&done, 35.0);
        assert_eq!(dnd.commit_drop(&done), EventOutcome::Handled);
        dnd.drag_end(Some(&t7));

        assert_eq!(
            sink.requests(),
            vec![MutationRequest {
                ticket_id: TicketId::new("T7"),
                from_column: ColumnId::new("backlog"),
                to_column: ColumnId::new("done"),
                from_ordered_ids: ids(&["T3", "T9"]),
                to_ordered_ids: ids(&["T1", "T7", "T2"]),
            }]
        );
        assert!(dnd.session().is_none());
    }

    #[test]
    fn test_same_column_reorder() {
        let (mut dnd, sink) = controller(&[("backlog", &["A", "B", "C"])]);
        let a = card(&dnd, "A");
        let backlog = zone(&dnd, "backlog");

        dnd.drag_start(&a);
        // Pointer past B's midpoint (60) but above C's (100)
        dnd.drag_over(&backlog, 70.0);
        dnd.commit_drop(&backlog);

        let requests = sink.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.is_reorder());
        assert_eq!(request.from_ordered_ids, ids(&["B", "A", "C"]));
        assert_eq!(request.to_ordered_ids, request.from_ordered_ids);
    }

    #[test]
    fn test_drop_with_missing_origin_column_reports_empty_order() {
        let (mut dnd, sink) = controller(&[("backlog", &["T1"]), ("done", &["D1"])]);
        let t1 = card(&dnd, "T1");
        let backlog = zone(&dnd, "backlog");
        let done = zone(&dnd, "done");

        dnd.drag_start(&t1);
        dnd.drag_over(&done, 0.0);
        dnd.dom_mut().detach(backlog);
        dnd.commit_drop(&done);

        let request = &sink.requests()[0];
        assert!(request.from_ordered_ids.is_empty());
        assert_eq!(request.to_ordered_ids, ids(&["T1", "D1"]));
    }

    #[test]
    fn test_drop_without_session_is_ignored() {
        let (mut dnd, sink) = controller(&[("done", &["D1"])]);
        let done = zone(&dnd, "done");

        assert_eq!(dnd.commit_drop(&done), EventOutcome::Ignored);
        assert!(sink.requests().is_empty());
    }

    #[test]
    fn test_drop_on_zone_without_column_is_ignored() {
        let (mut dnd, sink) = controller(&[("backlog", &["T1"]), ("done", &[])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");
        dnd.dom_mut().remove_attribute(done, "data-kanban-column");

        dnd.drag_start(&t1);
        assert_eq!(dnd.commit_drop(&done), EventOutcome::Ignored);
        assert!(sink.requests().is_empty());
        assert!(dnd.session().is_some());
    }

    #[test]
    fn test_cancelled_drag_leaves_no_session_or_highlight() {
        let (mut dnd, sink) = controller(&[("backlog", &["T1"]), ("done", &["D1"])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");

        dnd.drag_start(&t1);
        dnd.drag_over(&done, 0.0);
        dnd.drag_end(Some(&t1));

        assert!(dnd.session().is_none());
        assert!(!any_highlight(&dnd));
        assert!(!dnd.dom().has_class(&t1, "opacity-60"));
        assert!(sink.requests().is_empty());
        // The optimistic move is not rolled back
        assert_eq!(order(&dnd, "done"), vec!["T1", "D1"]);
    }

    #[test]
    fn test_drag_start_then_end_without_hover() {
        let (mut dnd, _) = controller(&[("backlog", &["T1"])]);
        let t1 = card(&dnd, "T1");

        dnd.drag_start(&t1);
        dnd.drag_end(None);

        assert!(dnd.session().is_none());
        assert!(!any_highlight(&dnd));
        assert!(!dnd.dom().has_class(&t1, "opacity-60"));
    }

    #[test]
    fn test_handle_dispatches_full_gesture() {
        let (mut dnd, sink) = controller(&[("backlog", &["T1"]), ("done", &[])]);
        let t1 = card(&dnd, "T1");
        let done = zone(&dnd, "done");

        assert_eq!(dnd.handle(BoardEvent::DragStart { target: t1 }), EventOutcome::Handled);
        assert_eq!(
            dnd.handle(BoardEvent::DragOver { zone: done, y: 10.0 }),
            EventOutcome::Handled
        );
        assert_eq!(dnd.handle(BoardEvent::Drop { zone: done }), EventOutcome::Handled);
        dnd.handle(BoardEvent::DragEnd { target: Some(t1) });

        assert_eq!(sink.requests()[0].to_ordered_ids, ids(&["T1"]));
        assert!(dnd.session().is_none());
    }

    #[test]
    fn test_custom_config_conventions() {
        let config = DndConfig {
            card_id_prefix: "card-".to_string(),
            dragging_class: "is-dragging".to_string(),
            highlight_classes: vec!["drop-target".to_string()],
            ..DndConfig::default()
        };
        let board = MemoryBoard::from_columns(config.clone(), &[("todo", &["X"]), ("doing", &[])]);
        let sink = RecordingSink::new();
        let mut dnd = KanbanDnd::new(board, sink.clone(), config);

        let x = dnd.dom().element_by_id("card-X").unwrap();
        let doing = dnd.dom().column("doing").unwrap();
        dnd.drag_start(&x);
        assert!(dnd.dom().has_class(&x, "is-dragging"));
        dnd.drag_over(&doing, 0.0);
        assert!(dnd.dom().has_class(&doing, "drop-target"));
        dnd.commit_drop(&doing);

        assert_eq!(sink.requests()[0].to_ordered_ids, ids(&["X"]));
        assert!(!dnd.dom().has_class(&doing, "drop-target"));
    }
}
