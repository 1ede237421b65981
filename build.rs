use std::env;

const MODE_OVERRIDE_ENV: &str = "PLATFORM_MODE_OVERRIDE";

fn main() {
    println!("cargo:rerun-if-env-changed={}", MODE_OVERRIDE_ENV);

    let value = match env::var(MODE_OVERRIDE_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return,
    };

    match value.trim().to_lowercase().as_str() {
        "enterprise" | "cloud" => {}
        other => panic!(
            "{} must be 'enterprise', 'cloud' or unset, got '{}'",
            MODE_OVERRIDE_ENV, other
        ),
    }

    if env::var("PROFILE").as_deref() == Ok("release") {
        println!(
            "cargo:warning={}={} forces the platform mode in a release build",
            MODE_OVERRIDE_ENV,
            value.trim()
        );
    }
}
