fn main() {
    if let Err(err) = vehicle_price_analytics::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
