fn main() {
    if let Err(err) = labelprint_lib::run() {
        eprintln!("labelprint: {err:#}");
        std::process::exit(1);
    }
}
