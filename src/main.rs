fn main() {
    sass_nesting::cli::run();
}
