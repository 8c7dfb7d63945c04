pub mod config;

pub mod shared {
    pub mod core {
        pub mod primitives;
        pub mod registry;
    }
    pub mod infrastructure {
        pub mod blob_storage;
        pub mod document_store;
        pub mod groupware_api;
    }
}

pub mod modules {
    pub mod employees {
        pub mod core {
            pub mod document_path;
            pub mod errors;
            pub mod profile_detail;
        }
        pub mod use_cases {
            pub mod get_user_by_id {
                pub mod handler;
            }
            pub mod upsert_user_profile_detail {
                pub mod handler;
            }
            pub mod upsert_user_document {
                pub mod handler;
            }
        }
    }
    pub mod checkins {
        pub mod core {
            pub mod partition;
        }
        pub mod store;
    }
    pub mod dashboard {
        pub mod store;
    }
}

pub mod shell;
