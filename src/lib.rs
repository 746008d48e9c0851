pub mod app;
pub mod config;
pub mod error;

pub mod domain {
    pub mod entities {
        pub mod dataset;
        pub mod edit;
        pub mod view_state;
    }
}

pub mod infra {
    pub mod http {
        pub mod client;
        pub mod wire;
    }
    pub mod location {
        pub mod url_location;
    }
    pub mod render {
        pub mod console;
    }
}

pub mod ui {
    pub mod state {
        pub mod app_state;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod api;
        pub mod location;
        pub mod view;
    }
    pub mod services {
        pub mod edit_service;
        pub mod export_service;
        pub mod gate_service;
        pub mod loading;
        pub mod query_service;
    }
}
