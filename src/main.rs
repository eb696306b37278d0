fn main() {
    std::process::exit(ocular_lib::run());
}
