use crate::ticket::ServiceTicket;

/// Name of the query parameter carrying the service ticket
pub const TICKET_PARAM: &str = "ticket";

/// Builds the query parameters for an authorized GET.
///
/// The ticket is set first and `extra` is overlaid on top, so a caller key
/// named `ticket` replaces the injected service ticket. The request then goes
/// out with the caller's value and the minted ticket is never spent.
///
/// Insertion order is preserved; an overlaid key keeps its original position.
pub fn merge_with_ticket<I, K, V>(ticket: ServiceTicket, extra: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut params = vec![(TICKET_PARAM.to_string(), ticket.into_string())];

    for (key, value) in extra {
        let key = key.into();
        let value = value.into();
        match params.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => {
                if key == TICKET_PARAM {
                    tracing::warn!(
                        "caller-supplied 'ticket' parameter overrides the service ticket"
                    );
                }
                slot.1 = value;
            }
            None => params.push((key, value)),
        }
    }

    params
}
