fn main() {
    stepscribe_lib::run()
}
