use crate::{
    domain::{BoundingBox, TicketId},
    host::BoardDom,
};

/// Picks the card the dragged card should be inserted before.
///
/// Each candidate's offset is the signed distance from `y` to its vertical
/// midpoint. Only candidates whose midpoint lies below the pointer
/// (`offset < 0`) qualify, and the one nearest to the pointer wins. Ties go
/// to the earliest candidate. `None` means append at the end.
pub fn insertion_point<E, I>(candidates: I, y: f64) -> Option<E>
where
    I: IntoIterator<Item = (E, BoundingBox)>,
{
    let mut closest: Option<(f64, E)> = None;

    for (el, bbox) in candidates {
        let offset = bbox.offset_from(y);
        if offset.is_nan() || offset >= 0.0 {
            continue;
        }
        let nearer = match &closest {
            Some((best, _)) => offset > *best,
            None => true,
        };
        if nearer {
            closest = Some((offset, el));
        }
    }

    closest.map(|(_, el)| el)
}

/// Runs [`insertion_point`] over the cards inside `zone`.
///
/// Any descendant whose DOM id carries the card prefix is a candidate,
/// except `dragged` itself, which is excluded by identity so its own stale
/// box can never be chosen. A card nested deeper than `zone`'s children is
/// measured by its own box but answered with the child of `zone` that holds
/// it, so the result is always a valid insertion reference.
pub fn drag_after_element<D: BoardDom>(
    dom: &D,
    zone: &D::Element,
    dragged: &D::Element,
    y: f64,
    card_id_prefix: &str,
) -> Option<D::Element> {
    let candidates = dom
        .descendants(zone)
        .into_iter()
        .filter(|el| el != dragged)
        .filter(|el| {
            dom.element_id(el)
                .and_then(|id| TicketId::from_dom_id(&id, card_id_prefix))
                .is_some()
        })
        .filter_map(|el| {
            let bbox = dom.bounding_box(&el);
            let slot = child_of_zone(dom, zone, el)?;
            // A card nested in the dragged one cannot anchor it
            (&slot != dragged).then_some((slot, bbox))
        });

    insertion_point(candidates, y)
}

/// Climbs from `el` to the ancestor-or-self that is a direct child of `zone`
fn child_of_zone<D: BoardDom>(dom: &D, zone: &D::Element, el: D::Element) -> Option<D::Element> {
    let mut current = el;
    loop {
        let parent = dom.parent(&current)?;
        if &parent == zone {
            return Some(current);
        }
        current = parent;
    }
}
