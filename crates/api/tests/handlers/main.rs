mod test_utils;

mod attendance_test;
mod auth_test;
mod employee_test;
mod enquiry_test;
mod follow_up_test;
mod gym_test;
mod member_test;
mod middleware_test;
mod workout_test;
