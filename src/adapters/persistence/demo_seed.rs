//! Sample documents for the in-memory demo store.

use crate::adapters::persistence::MemoryStore;
use crate::ports::{COMPLAINTS, MEMBERS, PAYMENTS};
use chrono::{Datelike, Months, Utc};
use serde_json::json;
use tracing::info;

/// Seed one member with a short payment history and two complaints.
/// The newest payment covers the current month.
pub async fn seed_demo(store: &MemoryStore, member_id: &str, name: &str, gym_id: Option<&str>) {
    let now = Utc::now();
    store
        .put(
            MEMBERS,
            member_id,
            json!({
                "name": name,
                "email": "member@example.com",
                "phone": "555-0100",
                "gymId": gym_id,
                "weight": 72.0,
                "height": 178.0,
                "status": "active",
                "membershipLevel": "Gold",
                "emergencyContact": { "name": "Sam", "phone": "555-0199", "relation": "Partner" }
            }),
        )
        .await;

    for (i, amount) in [(0u32, 45.0), (1, 45.0), (2, 40.0), (14, 40.0)] {
        let Some(paid_at) = now.checked_sub_months(Months::new(i)) else {
            continue;
        };
        let month = format!("{:04}-{:02}", paid_at.year(), paid_at.month());
        store
            .put(
                PAYMENTS,
                &format!("demo-pay-{}", i),
                json!({
                    "memberId": member_id,
                    "month": month,
                    "amount": amount,
                    "paymentMethod": if i % 2 == 0 { "Card" } else { "Cash" },
                    "paidAt": paid_at,
                    "recordedBy": "Front desk",
                }),
            )
            .await;
    }

    store
        .put(
            COMPLAINTS,
            "demo-complaint-1",
            json!({
                "memberId": member_id,
                "memberName": name,
                "gymId": gym_id,
                "subject": "Rowing machine display broken",
                "category": "Equipment",
                "priority": "Medium",
                "description": "The display on rowing machine 2 stays blank.",
                "isAnonymous": false,
                "status": "Resolved",
                "responses": [
                    {
                        "respondedBy": "Maintenance",
                        "message": "Replaced the display unit.",
                        "respondedAt": now
                    }
                ],
                "createdAt": now - chrono::Duration::days(10),
            }),
        )
        .await;
    store
        .put(
            COMPLAINTS,
            "demo-complaint-2",
            json!({
                "memberId": member_id,
                "memberName": "Anonymous",
                "gymId": gym_id,
                "subject": "Changing room cleanliness",
                "category": "Cleanliness",
                "priority": "High",
                "description": "Showers not cleaned in the evenings.",
                "isAnonymous": true,
                "status": "Pending",
                "responses": [],
                "createdAt": now - chrono::Duration::days(1),
            }),
        )
        .await;

    info!(member_id, "demo data seeded");
}
