pub trait Wrapper<T> {
  fn eject(self) -> T;
}
