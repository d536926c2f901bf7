fn main() {
    std::process::exit(taskchain::app::startup::run());
}
