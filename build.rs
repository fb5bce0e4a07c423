fn main() {
    // ESP-IDF builds need the toolchain environment forwarded to rustc;
    // host builds (tests, fuzzing) have nothing to set up.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
