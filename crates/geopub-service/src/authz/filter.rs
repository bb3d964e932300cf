//! Read-filtering of multi-publication listings.
//!
//! Collection GETs are authorized as a whole (workspace existence only);
//! what the actor actually gets to see is decided per item here, after the
//! handler has produced the unfiltered list.

use crate::error::ServiceResult;

use super::rule::RuleEvaluator;
use super::store::{PublicationInfo, RoleStore};

/// ## Summary
/// Keeps only the publications whose read rule admits the actor, preserving
/// the input order. Pure with respect to the items; the caller serializes
/// the result.
///
/// ## Errors
/// Role-store failures propagate unchanged.
pub async fn filter_publication_list<S: RoleStore>(
    evaluator: &RuleEvaluator<S>,
    actor: Option<&str>,
    items: Vec<PublicationInfo>,
) -> ServiceResult<Vec<PublicationInfo>> {
    let mut visible = Vec::with_capacity(items.len());

    for item in items {
        if evaluator
            .is_principal_in_rule(actor, &item.access_rights.read)
            .await?
        {
            visible.push(item);
        }
    }

    Ok(visible)
}
