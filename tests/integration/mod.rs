mod helpers;
mod test_check;
