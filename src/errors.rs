//! Error types for tdmm-graph.

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    errors {
        MalformedValue(text: String) {
            description("malformed numeric value")
            display("malformed numeric value: {:?}", text)
        }
        Setting {
            description("error in loading the setting")
        }
        Chart(name: String) {
            description("error in drawing a chart")
            display("failed to draw {}", name)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
    }
}
