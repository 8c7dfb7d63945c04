use crate::modules::employees::use_cases::get_user_by_id::handler::GetUserByIdHandler;
use crate::modules::employees::use_cases::upsert_user_profile_detail::handler::UpsertUserProfileDetailHandler;
use crate::shared::core::primitives::UserId;
use crate::shared::core::registry::{Collection, ProfileSection, enumerated_values};
use crate::shared::infrastructure::document_store::DocumentPath;
use crate::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use crate::tests::fixtures::documents::{make_document, make_user};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn reads_back_every_section_exactly_as_written() {
    let store = Arc::new(InMemoryDocumentStore::new());
    store
        .insert(&DocumentPath::collection(Collection::Users).doc("7"), make_user())
        .await;
    let upsert = UpsertUserProfileDetailHandler::new(store.clone());
    let get = GetUserByIdHandler::new(store.clone());
    let user_id = UserId::from(7u64);

    let patch = make_document(json!({
        "personal": { "full_name": "Sari W.", "birth_date": "1992-04-11", "children": 3 },
        "docs": { "ktp": "https://files.example.com/ktp-7.jpg" },
        "education": [
            { "degree": "BSc", "institution": "UI", "year": 2014 },
            { "degree": "MSc", "institution": "ITB", "year": 2017, "gpa": 3.71 }
        ],
        "previous_job": null,
        "bank_account": { "bank": "BCA", "number": "0123456789" },
        "emergency_contact": { "name": "Budi", "phone": "+62 812 0000 0000" },
        "enneagram": { "type": 5, "wing": "w4", "tested": true }
    }));

    for (section, value) in &patch {
        let mut single = serde_json::Map::new();
        single.insert(section.clone(), value.clone());
        upsert.handle(&user_id, Some(single)).await.unwrap();
    }

    let stored = get.handle(&user_id).await.unwrap().unwrap();
    for (section, value) in &patch {
        assert_eq!(&stored[section], value, "section {section}");
    }
    assert_eq!(stored["assignment"], make_user()["assignment"]);
    assert_eq!(stored["email"], make_user()["email"]);
    assert!(
        patch
            .keys()
            .all(|key| enumerated_values::<ProfileSection>().contains(&key.as_str()))
    );
}

#[tokio::test]
async fn leaves_the_record_untouched_when_one_section_is_rejected() {
    let store = Arc::new(InMemoryDocumentStore::new());
    store
        .insert(&DocumentPath::collection(Collection::Users).doc("u1"), make_user())
        .await;
    let upsert = UpsertUserProfileDetailHandler::new(store.clone());
    let get = GetUserByIdHandler::new(store.clone());
    let user_id = UserId::from("u1");

    let result = upsert
        .handle(
            &user_id,
            Some(make_document(json!({ "personal": { "full_name": "X" }, "salary": 1 }))),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(get.handle(&user_id).await.unwrap(), Some(make_user()));
}
