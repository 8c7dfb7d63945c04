use crate::shared::core::primitives::{Document, UploadFile};
use serde_json::{Value, json};

fn as_document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

pub fn make_user() -> Document {
    as_document(json!({
        "email": "sari@example.com",
        "role": "employee",
        "personal": {
            "full_name": "Sari Wulandari",
            "birth_date": "1992-04-11",
            "children": 2,
            "height_cm": 161.5
        },
        "assignment": {
            "division": "Engineering",
            "start_date": "2021-02-01"
        }
    }))
}

pub fn make_checkin(user_id: &str, checkin_at: &str) -> Document {
    as_document(json!({
        "user_id": user_id,
        "checkin_at": checkin_at,
        "location": "Jakarta"
    }))
}

pub fn make_document(value: Value) -> Document {
    as_document(value)
}

pub fn make_ktp_scan() -> UploadFile {
    UploadFile::new("scan.ktp.jpg", vec![7u8; 10]).with_content_type("image/jpeg")
}
