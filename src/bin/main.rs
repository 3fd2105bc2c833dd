fn main() {
  stash::main();
}
