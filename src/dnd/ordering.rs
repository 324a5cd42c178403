use crate::{domain::TicketId, host::BoardDom};

/// Ticket ids of the cards directly inside `zone`, top to bottom.
///
/// Reads the live tree every time, so it reflects any optimistic move the
/// hover handler has already made. Children whose DOM id lacks the card
/// prefix are not cards and are skipped.
pub fn ordered_ids<D: BoardDom>(dom: &D, zone: &D::Element, card_id_prefix: &str) -> Vec<TicketId> {
    dom.children(zone)
        .iter()
        .filter_map(|el| dom.element_id(el))
        .filter_map(|id| TicketId::from_dom_id(&id, card_id_prefix))
        .collect()
}
