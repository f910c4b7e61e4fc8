use tmdb_proxy_core::proxy::ROUTES;

pub fn run() {
    println!("{:<8} {:<28} {:<28} {}", "METHOD", "LOCAL", "UPSTREAM", "EXTRA PARAMS");

    for route in ROUTES {
        let mut extra: Vec<String> = route
            .forwarded_params
            .iter()
            .map(|name| format!("{}=<query>", name))
            .collect();
        extra.extend(route.fixed_params.iter().map(|(k, v)| format!("{}={}", k, v)));

        println!(
            "{:<8} {:<28} {:<28} {}",
            route.method.as_str(),
            route.local_path,
            route.upstream_path,
            if extra.is_empty() { "-".to_string() } else { extra.join(" ") }
        );
    }

    println!();
    println!("Every route also accepts ?language=<lang>[-<REGION>] and sends api_key, language, region upstream.");
}
