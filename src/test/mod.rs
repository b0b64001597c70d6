
mod test_driver;
mod test_goals;
