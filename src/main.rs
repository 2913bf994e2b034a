fn main() {
    if let Err(err) = csvschema::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
