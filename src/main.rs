fn main() {
    yovec::cli::run();
}
